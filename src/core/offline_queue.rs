//! Durable FIFO of timer mutations that the server has not confirmed yet.
//!
//! The whole list is stored as one JSON array under [`QUEUE_STORAGE_KEY`].
//! Every mutation is written through: the new list is persisted first and
//! only then replaces the in-memory copy, so a crash can lose a network
//! round-trip but never a queued action.

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{kv_get, kv_put};
use crate::errors::{AppError, AppResult};
use crate::models::QueuedAction;
use crate::ui::messages::warning;
use std::cell::RefCell;

pub const QUEUE_STORAGE_KEY: &str = "offline_timer_queue";

/// Where an unreadable queue payload is parked before it gets overwritten.
pub const CORRUPT_QUEUE_KEY: &str = "offline_timer_queue.corrupt";

pub struct OfflineQueue {
    store: DbPool,
    actions: RefCell<Vec<QueuedAction>>,
}

impl OfflineQueue {
    /// Load the persisted queue. Missing data is an empty queue; so is data
    /// that does not parse, which is kept aside under [`CORRUPT_QUEUE_KEY`].
    pub fn load(store: DbPool) -> AppResult<Self> {
        let actions = match kv_get(&store, QUEUE_STORAGE_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<QueuedAction>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warning(format!("Offline queue is unreadable, starting empty: {}", e));
                    kv_put(&store, CORRUPT_QUEUE_KEY, &raw)?;
                    ttlog_quiet(&store.conn, "queue_corrupt", QUEUE_STORAGE_KEY, &e.to_string());
                    Vec::new()
                }
            },
        };

        Ok(Self {
            store,
            actions: RefCell::new(actions),
        })
    }

    pub fn store(&self) -> &DbPool {
        &self.store
    }

    /// Append an action. Its retry counter always starts at zero.
    pub fn enqueue(&self, mut action: QueuedAction) -> AppResult<QueuedAction> {
        action.retry_count = 0;
        let stored = action.clone();
        self.commit(|list| {
            list.push(action);
            Ok(())
        })?;

        ttlog_quiet(
            &self.store.conn,
            "enqueue",
            &stored.id,
            &format!("{} job {} for {}", stored.kind, stored.job_id, stored.technician_name),
        );
        Ok(stored)
    }

    /// Remove an action the server has acknowledged.
    pub fn dequeue(&self, id: &str) -> AppResult<QueuedAction> {
        let removed = self.take(id)?;
        ttlog_quiet(
            &self.store.conn,
            "dequeue",
            id,
            &format!("{} job {} confirmed by server", removed.kind, removed.job_id),
        );
        Ok(removed)
    }

    /// Record one more failed replay; returns the new counter.
    pub fn increment_retry(&self, id: &str) -> AppResult<u32> {
        let count = self.commit(|list| {
            let action = list
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AppError::QueueEntryNotFound(id.to_string()))?;
            action.retry_count = action.retry_count.saturating_add(1);
            Ok(action.retry_count)
        })?;

        ttlog_quiet(&self.store.conn, "retry", id, &format!("retry_count={}", count));
        Ok(count)
    }

    /// Snapshot in insertion order. The queue never reorders.
    pub fn peek_ordered(&self) -> Vec<QueuedAction> {
        self.actions.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<QueuedAction> {
        self.actions.borrow().iter().find(|a| a.id == id).cloned()
    }

    /// Actions of one technician, oldest first.
    pub fn pending_for(&self, technician_name: &str) -> Vec<QueuedAction> {
        self.actions
            .borrow()
            .iter()
            .filter(|a| a.technician_name == technician_name)
            .cloned()
            .collect()
    }

    /// Resolve a full id or an unambiguous prefix of one.
    pub fn resolve_id(&self, id_or_prefix: &str) -> AppResult<String> {
        let needle = id_or_prefix.trim();
        let actions = self.actions.borrow();
        if let Some(exact) = actions.iter().find(|a| a.id == needle) {
            return Ok(exact.id.clone());
        }

        let mut matches = actions.iter().filter(|a| !needle.is_empty() && a.id.starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.id.clone()),
            _ => Err(AppError::QueueEntryNotFound(needle.to_string())),
        }
    }

    /// Operator escape hatch for a stuck entry.
    pub fn remove(&self, id: &str) -> AppResult<QueuedAction> {
        let removed = self.take(id)?;
        ttlog_quiet(
            &self.store.conn,
            "remove",
            id,
            &format!(
                "{} job {} removed manually after {} failed attempts",
                removed.kind, removed.job_id, removed.retry_count
            ),
        );
        Ok(removed)
    }

    /// Operator escape hatch: drop every queued action.
    pub fn clear(&self) -> AppResult<usize> {
        let dropped = self.commit(|list| {
            let n = list.len();
            list.clear();
            Ok(n)
        })?;

        ttlog_quiet(
            &self.store.conn,
            "clear",
            QUEUE_STORAGE_KEY,
            &format!("{} queued actions cleared manually", dropped),
        );
        Ok(dropped)
    }

    pub fn len(&self) -> usize {
        self.actions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.borrow().is_empty()
    }

    fn take(&self, id: &str) -> AppResult<QueuedAction> {
        self.commit(|list| {
            let pos = list
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| AppError::QueueEntryNotFound(id.to_string()))?;
            Ok(list.remove(pos))
        })
    }

    /// Apply `change` to a copy of the list, persist the copy, then swap it in.
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut Vec<QueuedAction>) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut next = self.actions.borrow().clone();
        let out = change(&mut next)?;

        let payload = serde_json::to_string(&next)?;
        kv_put(&self.store, QUEUE_STORAGE_KEY, &payload)?;

        *self.actions.borrow_mut() = next;
        Ok(out)
    }
}

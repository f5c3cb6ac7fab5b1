//! Replays the offline queue against the timer service.
//!
//! Ordering rules of a pass:
//! - actions are sent one at a time, oldest first;
//! - an action failing for the first time lets the pass go on, but later
//!   actions of the same job are held back so a STOP never overtakes its START;
//! - an action that had already failed halts the pass;
//! - nothing is ever dropped automatically, however often it fails.

use crate::api::TimerApi;
use crate::core::connectivity::Connectivity;
use crate::core::offline_queue::OfflineQueue;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::{ActionType, QueuedAction, TimerEntry};
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Failed attempts after which an action is reported as persistently failed.
pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    Offline,
    Empty,
}

/// Outcome of one sync pass. Ids refer to queued actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub skipped: Option<SkipReason>,
    pub sent: Vec<String>,
    pub failed: Vec<String>,
    pub held: Vec<String>,
    pub halted_at: Option<String>,
}

impl SyncReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn ran(&self) -> bool {
        self.skipped.is_none()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.held.is_empty() && self.halted_at.is_none()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.skipped {
            Some(SkipReason::InFlight) => write!(f, "sync already in progress"),
            Some(SkipReason::Offline) => write!(f, "offline, nothing sent"),
            Some(SkipReason::Empty) => write!(f, "nothing to sync"),
            None => {
                write!(
                    f,
                    "sent {}, failed {}, held {}",
                    self.sent.len(),
                    self.failed.len(),
                    self.held.len()
                )?;
                if let Some(id) = &self.halted_at {
                    write!(f, ", halted at {}", id.get(..8).unwrap_or(id))?;
                }
                Ok(())
            }
        }
    }
}

/// What the technician sees about pending work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    QueuedOffline(usize),
    PendingOnline(usize),
    /// At least one action reached [`MAX_RETRIES`]; needs manual removal or
    /// server-side reconciliation.
    PersistentlyFailed(usize),
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "all changes synced"),
            SyncStatus::QueuedOffline(n) => write!(f, "{} action(s) queued while offline", n),
            SyncStatus::PendingOnline(n) => write!(f, "{} action(s) pending sync", n),
            SyncStatus::PersistentlyFailed(n) => {
                write!(f, "{} action(s) failed {} times and need attention", n, MAX_RETRIES)
            }
        }
    }
}

/// Result of handing a new action to the engine.
#[derive(Debug, Clone)]
pub struct EnqueueOutcome {
    pub action: QueuedAction,
    /// The pass triggered by the enqueue, when the device was online.
    pub sync: Option<SyncReport>,
}

impl EnqueueOutcome {
    /// Whether this very action was confirmed by the triggered pass.
    pub fn confirmed(&self) -> bool {
        self.sync
            .as_ref()
            .is_some_and(|r| r.sent.iter().any(|id| *id == self.action.id))
    }
}

/// Clears the in-flight flag however the pass ends.
struct FlightGuard<'a>(&'a Cell<bool>);

impl<'a> FlightGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct SyncEngine<A: TimerApi> {
    api: A,
    queue: OfflineQueue,
    online: Cell<bool>,
    in_flight: Cell<bool>,
}

impl<A: TimerApi> SyncEngine<A> {
    pub fn new(api: A, queue: OfflineQueue) -> Self {
        Self {
            api,
            queue,
            online: Cell::new(false),
            in_flight: Cell::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.get()
    }

    /// Record the connectivity state. Returns true on an offline → online edge.
    pub fn set_online(&self, online: bool) -> bool {
        let was = self.online.replace(online);
        !was && online
    }

    /// Connectivity observer entry point. On the online edge, waits `settle`,
    /// probes `link` again and syncs only if the server still answers. A zero
    /// `settle` trusts the edge as reported.
    pub async fn on_connectivity_change(
        &self,
        online: bool,
        settle: Duration,
        link: &mut Connectivity,
    ) -> Option<SyncReport> {
        if !self.set_online(online) {
            return None;
        }

        ttlog_quiet(&self.queue.store().conn, "online", "", "connectivity restored");
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;

            let (still_up, _) = link.observe().await;
            self.set_online(still_up);
            if !still_up {
                ttlog_quiet(
                    &self.queue.store().conn,
                    "offline",
                    "",
                    "link dropped during reconnect settle",
                );
                return None;
            }
        }
        Some(self.sync_queue().await)
    }

    /// Persist an action, then flush right away when online.
    pub async fn enqueue(&self, action: QueuedAction) -> AppResult<EnqueueOutcome> {
        let action = self.queue.enqueue(action)?;
        let sync = if self.is_online() {
            Some(self.sync_queue().await)
        } else {
            None
        };
        Ok(EnqueueOutcome { action, sync })
    }

    /// One ordered replay pass over the queue. Never fails: every problem
    /// becomes queue state and shows up in the report.
    pub async fn sync_queue(&self) -> SyncReport {
        if self.in_flight.get() {
            return SyncReport::skipped(SkipReason::InFlight);
        }
        if self.queue.is_empty() {
            return SyncReport::skipped(SkipReason::Empty);
        }
        if !self.is_online() {
            return SyncReport::skipped(SkipReason::Offline);
        }

        let _guard = FlightGuard::engage(&self.in_flight);
        let mut report = SyncReport::default();
        let mut blocked_jobs: HashSet<i64> = HashSet::new();

        for snapshot in self.queue.peek_ordered() {
            // Removed by the operator while an earlier call was in flight.
            let Some(action) = self.queue.get(&snapshot.id) else {
                continue;
            };

            if blocked_jobs.contains(&action.job_id) {
                report.held.push(action.id.clone());
                continue;
            }

            match self.dispatch(&action).await {
                Ok(_) => {
                    if let Err(e) = self.queue.dequeue(&action.id) {
                        // Confirmed remotely but still stored: stop here rather
                        // than replay anything on top of an inconsistent queue.
                        self.log_failure("dequeue_failed", &action, &e);
                        report.halted_at = Some(action.id.clone());
                        break;
                    }
                    report.sent.push(action.id.clone());
                }
                Err(e) => {
                    let failed_before = action.has_failed();
                    self.log_failure("sync_failed", &action, &e);

                    if let Err(store_err) = self.queue.increment_retry(&action.id) {
                        self.log_failure("retry_not_saved", &action, &store_err);
                    }
                    report.failed.push(action.id.clone());

                    if failed_before {
                        report.halted_at = Some(action.id.clone());
                        break;
                    }
                    blocked_jobs.insert(action.job_id);
                }
            }
        }

        ttlog_quiet(&self.queue.store().conn, "sync", "", &report.to_string());
        report
    }

    pub fn status(&self) -> SyncStatus {
        let actions = self.queue.peek_ordered();
        if actions.is_empty() {
            return SyncStatus::Synced;
        }

        let exhausted = actions.iter().filter(|a| a.retry_count >= MAX_RETRIES).count();
        if exhausted > 0 {
            SyncStatus::PersistentlyFailed(exhausted)
        } else if self.is_online() {
            SyncStatus::PendingOnline(actions.len())
        } else {
            SyncStatus::QueuedOffline(actions.len())
        }
    }

    async fn dispatch(&self, action: &QueuedAction) -> AppResult<TimerEntry> {
        let notes = action.notes.as_deref();
        match action.kind {
            ActionType::Start => {
                self.api
                    .start_job_timer(action.job_id, &action.technician_name, notes)
                    .await
            }
            ActionType::Stop => {
                self.api
                    .stop_job_timer(action.job_id, &action.technician_name, notes)
                    .await
            }
        }
    }

    fn log_failure(&self, operation: &str, action: &QueuedAction, err: &AppError) {
        // 4xx answers are retried like any other failure; flag them so the
        // operator can spot actions that will never succeed.
        let hint = if err.is_client_error() { " [rejected by server]" } else { "" };
        ttlog_quiet(
            &self.queue.store().conn,
            operation,
            &action.id,
            &format!("{} job {}: {}{}", action.kind, action.job_id, err, hint),
        );
    }
}

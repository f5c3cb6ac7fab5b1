//! In-memory view of the technician's running timer.
//!
//! Two layers: the optimistic projection held here, and the durable intent
//! log (the offline queue) owned by the sync engine. Start/stop change the
//! projection first and never roll it back on network failure.

use crate::api::TimerApi;
use crate::core::sync_engine::{EnqueueOutcome, SyncEngine};
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::{ActionType, ActiveTimer, QueuedAction};
use crate::utils::formatting;
use chrono::{DateTime, Utc};

/// Where the initial state came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// The server reported a running timer.
    Server,
    /// The server reported no timer.
    Empty,
    /// The read failed or the device was offline; started empty.
    Unavailable(String),
}

pub struct ActiveTimerCache<A: TimerApi> {
    technician: String,
    active: Option<ActiveTimer>,
    engine: SyncEngine<A>,
}

impl<A: TimerApi> ActiveTimerCache<A> {
    pub fn new(technician: &str, engine: SyncEngine<A>) -> Self {
        Self {
            technician: technician.to_string(),
            active: None,
            engine,
        }
    }

    pub fn technician(&self) -> &str {
        &self.technician
    }

    pub fn engine(&self) -> &SyncEngine<A> {
        &self.engine
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        self.active.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// One read of the server's active timer, then the technician's
    /// unconfirmed actions are laid over it. A failed read is logged and
    /// leaves the cache empty; there is no retry here.
    pub async fn initialize(&mut self) -> Hydration {
        let hydration = if !self.engine.is_online() {
            Hydration::Unavailable("offline".to_string())
        } else {
            match self.engine.api().get_active_timer(&self.technician).await {
                Ok(Some(timer)) => {
                    self.active = Some(timer);
                    Hydration::Server
                }
                Ok(None) => Hydration::Empty,
                Err(e) => Hydration::Unavailable(e.to_string()),
            }
        };

        if let Hydration::Unavailable(reason) = &hydration {
            ttlog_quiet(
                &self.engine.queue().store().conn,
                "hydrate_failed",
                &self.technician,
                reason,
            );
        }

        self.project_pending();
        hydration
    }

    /// The last queued action of this technician decides the state, since the
    /// server has not seen it yet.
    fn project_pending(&mut self) {
        let pending = self.engine.queue().pending_for(&self.technician);
        if let Some(last) = pending.last() {
            self.active = match last.kind {
                ActionType::Start => Some(ActiveTimer::started_at(last.job_id, last.timestamp)),
                ActionType::Stop => None,
            };
        }
    }

    /// Start timing `job_id`. Fails with `AlreadyRunning` while another job
    /// is timed; starting the job that already runs changes nothing.
    pub async fn start_timer(
        &mut self,
        job_id: i64,
        notes: Option<String>,
    ) -> AppResult<Option<EnqueueOutcome>> {
        if let Some(current) = &self.active {
            if current.job_id != job_id {
                return Err(AppError::AlreadyRunning {
                    running_job: current.job_id,
                    requested_job: job_id,
                });
            }
            return Ok(None);
        }

        let action = QueuedAction::new(ActionType::Start, job_id, &self.technician, notes);
        self.active = Some(ActiveTimer::started_at(job_id, action.timestamp));

        match self.engine.enqueue(action).await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                // Not durable, so not optimistic either.
                self.active = None;
                Err(e)
            }
        }
    }

    /// Stop timing `job_id`. Fails with `NoActiveTimer` unless that job is
    /// the one running.
    pub async fn stop_timer(&mut self, job_id: i64, notes: Option<String>) -> AppResult<EnqueueOutcome> {
        match &self.active {
            Some(current) if current.job_id == job_id => {}
            _ => return Err(AppError::NoActiveTimer(job_id)),
        }

        let action = QueuedAction::new(ActionType::Stop, job_id, &self.technician, notes);
        let previous = self.active.take();

        self.engine.enqueue(action).await.inspect_err(|_| {
            self.active = previous;
        })
    }

    /// Advance the local clock. No I/O.
    pub fn tick(&mut self) -> Option<i64> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<i64> {
        let timer = self.active.as_mut()?;
        timer.recompute(now);
        Some(timer.elapsed_seconds)
    }

    pub fn format_elapsed(seconds: i64) -> String {
        formatting::format_elapsed(seconds)
    }
}

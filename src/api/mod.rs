//! Remote job-timer resource.
//!
//! [`TimerApi`] is the seam the sync engine is written against; the HTTP
//! implementation lives in [`client`]. Nothing here retries: failures come
//! back as `AppError::Network` or `AppError::Server` and the caller decides.

pub mod client;
pub mod dto;

pub use client::HttpTimerApi;

use crate::errors::AppResult;
use crate::models::{ActiveTimer, TimerEntry};

#[allow(async_fn_in_trait)]
pub trait TimerApi {
    /// `GET /jobs/technician/{name}/active-timer`
    async fn get_active_timer(&self, technician_name: &str) -> AppResult<Option<ActiveTimer>>;

    /// `POST /jobs/{job_id}/timer/start`
    async fn start_job_timer(
        &self,
        job_id: i64,
        technician_name: &str,
        notes: Option<&str>,
    ) -> AppResult<TimerEntry>;

    /// `POST /jobs/{job_id}/timer/stop`
    async fn stop_job_timer(
        &self,
        job_id: i64,
        technician_name: &str,
        notes: Option<&str>,
    ) -> AppResult<TimerEntry>;

    /// `GET /jobs/{job_id}/timers`
    async fn get_job_timers(&self, job_id: i64) -> AppResult<Vec<TimerEntry>>;
}

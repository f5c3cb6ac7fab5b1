//! Time utilities: job id parsing and local rendering of UTC timestamps.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, Utc};

pub fn parse_job_id(s: &str) -> AppResult<i64> {
    s.trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidJobId(s.to_string()))
}

/// `YYYY-MM-DD HH:MM:SS` in the device's local timezone.
pub fn to_local_string(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

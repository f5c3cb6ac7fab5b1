use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single in-progress timer of a technician.
///
/// `elapsed_seconds` is derived from `start_time` and recomputed on every
/// tick; it is only carried on the wire because the server reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    pub job_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub elapsed_seconds: i64,
}

impl ActiveTimer {
    pub fn started_at(job_id: i64, start_time: DateTime<Utc>) -> Self {
        let mut timer = Self {
            job_id,
            start_time,
            elapsed_seconds: 0,
        };
        timer.recompute(Utc::now());
        timer
    }

    /// Recompute the elapsed time against `now`. Clock skew never yields a
    /// negative value.
    pub fn recompute(&mut self, now: DateTime<Utc>) {
        self.elapsed_seconds = (now - self.start_time).num_seconds().max(0);
    }
}

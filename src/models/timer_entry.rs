use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed (or still open) start/stop interval owned by the server.
///
/// The server omits fields depending on the endpoint, so everything is
/// optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimerEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub technician_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TimerEntry {
    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Minutes accumulated by this entry. Prefers the server's figure and
    /// falls back to the interval bounds; open entries count as zero.
    pub fn minutes(&self) -> i64 {
        if let Some(m) = self.duration_minutes {
            return m.max(0);
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_minutes().max(0),
            _ => 0,
        }
    }
}

/// Total time spent on a job across all entries.
pub fn total_minutes(entries: &[TimerEntry]) -> i64 {
    entries.iter().map(TimerEntry::minutes).sum()
}

use super::action_type::ActionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A start/stop mutation that the server has not confirmed yet.
///
/// Serialized verbatim (camelCase) into the local key/value store, so field
/// names are part of the persisted format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub job_id: i64,
    pub timestamp: DateTime<Utc>,
    pub technician_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
}

impl QueuedAction {
    /// Build a fresh action stamped with the current time.
    ///
    /// Ids are UUID v7: time-ordered, so they sort the same way they were
    /// created, and random enough that two actions never share one.
    pub fn new(kind: ActionType, job_id: i64, technician_name: &str, notes: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            kind,
            job_id,
            timestamp: Utc::now(),
            technician_name: technician_name.to_string(),
            notes: notes.filter(|n| !n.trim().is_empty()),
            retry_count: 0,
        }
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn has_failed(&self) -> bool {
        self.retry_count > 0
    }
}

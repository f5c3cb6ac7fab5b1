//! Wire shapes of the job-timer resource (camelCase JSON).

use crate::models::{ActiveTimer, TimerEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRequest<'a> {
    pub technician_name: &'a str,
    pub notes: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimerResponse {
    #[serde(default)]
    pub active_timer: Option<ActiveTimer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub timer: Option<TimerEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimersResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub timers: Vec<TimerEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error bodies are `{ "message": ... }` or `{ "error": ... }` depending on
/// the route.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

//! Unified application error type.
//! Every layer (db, api, core, cli) returns AppError so callers can tell
//! local precondition failures apart from retryable transport failures.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Timer preconditions (never queued)
    // ---------------------------
    #[error("A timer is already running for job {running_job} (requested job {requested_job})")]
    AlreadyRunning { running_job: i64, requested_job: i64 },

    #[error("No active timer for job {0}")]
    NoActiveTimer(i64),

    // ---------------------------
    // Remote timer service (retryable)
    // ---------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    // ---------------------------
    // Offline queue
    // ---------------------------
    #[error("Queued action not found: {0}")]
    QueueEntryNotFound(String),

    // ---------------------------
    // Input / config
    // ---------------------------
    #[error("Invalid job id: {0}")]
    InvalidJobId(String),

    #[error("Missing technician name (set `technician` in the config or pass --technician)")]
    MissingTechnician,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// 4xx responses. Still retried, only surfaced differently to the operator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Server { status, .. } if (400..500).contains(status))
    }
}

pub type AppResult<T> = Result<T, AppError>;

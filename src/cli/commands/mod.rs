pub mod config;
pub mod entries;
pub mod init;
pub mod log;
pub mod queue;
pub mod start;
pub mod status;
pub mod stop;
pub mod sync;
pub mod watch;

use crate::api::TimerApi;
use crate::core::sync_engine::{EnqueueOutcome, SyncEngine, SyncReport, SyncStatus};
use crate::core::timer_cache::Hydration;
use crate::ui::messages::{error, info, queued, success, warning};
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub(crate) fn report_hydration(hydration: &Hydration) {
    if let Hydration::Unavailable(reason) = hydration
        && reason != "offline"
    {
        warning(format!(
            "Could not read the active timer from the server ({}); showing local state.",
            reason
        ));
    }
}

/// Tell the technician what happened to a start/stop they just issued.
pub(crate) fn report_outcome(verb: &str, outcome: &EnqueueOutcome) {
    let job = outcome.action.job_id;
    if outcome.confirmed() {
        success(format!("{} timer for job {} (confirmed by server).", verb, job));
        return;
    }

    match &outcome.sync {
        None => queued(format!(
            "{} timer for job {} offline; it will be sent when the server is reachable.",
            verb, job
        )),
        Some(report) => queued(format!(
            "{} timer for job {}; server has not confirmed yet ({}).",
            verb, job, report
        )),
    }
}

pub(crate) fn report_sync(report: &SyncReport) {
    if !report.ran() {
        info(format!("Sync: {}", report));
    } else if report.is_clean() {
        success(format!("Sync: {}", report));
    } else {
        warning(format!("Sync: {}", report));
    }
}

pub(crate) fn print_status<A: TimerApi>(engine: &SyncEngine<A>) {
    let status = engine.status();
    match status {
        SyncStatus::Synced => success(status),
        SyncStatus::QueuedOffline(_) => queued(status),
        SyncStatus::PendingOnline(_) => warning(status),
        SyncStatus::PersistentlyFailed(_) => {
            error(status);
            info("Inspect with `jobtimer queue list`, remove stuck entries with `jobtimer queue remove <id>`.");
        }
    }
}

//! Long-running mode: one cooperative loop drives the display tick,
//! connectivity probes, reconnect syncs and commands typed on stdin.

use super::{print_status, report_hydration, report_outcome, report_sync};
use crate::config::Config;
use crate::core::connectivity::Transition;
use crate::core::session::{HttpTimerCache, Session};
use crate::core::ticker::Ticker;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, warning};
use crate::utils::formatting::format_elapsed;
use crate::utils::time::parse_job_id;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

const HELP: &str = "Commands: start <job> [notes] | stop <job> [notes] | sync | status | help | quit";

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let Session {
        mut cache,
        mut connectivity,
        hydration,
        settle,
    } = Session::open(cfg).await?;
    report_hydration(&hydration);

    let mut ticker = Ticker::new();
    ticker.sync_with(cache.is_running());

    let mut probe = tokio::time::interval(Duration::from_secs(cfg.probe_interval_secs.max(1)));
    probe.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // first tick completes immediately; the session already probed once
    probe.tick().await;

    if cache.engine().is_online() {
        let report = cache.engine().sync_queue().await;
        if report.ran() {
            report_sync(&report);
        }
    }

    info(HELP);
    print_status(cache.engine());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.next() => {
                if let (Some(secs), Some(timer)) = (cache.tick(), cache.active()) {
                    print!("\r⏱  job {}  {}   ", timer.job_id, format_elapsed(secs));
                    let _ = std::io::stdout().flush();
                }
            }
            _ = probe.tick() => {
                let (online, transition) = connectivity.observe().await;
                match transition {
                    Some(Transition::WentOnline) => {
                        println!();
                        info("Back online.");
                        if let Some(report) = cache
                            .engine()
                            .on_connectivity_change(true, settle, &mut connectivity)
                            .await
                        {
                            report_sync(&report);
                            print_status(cache.engine());
                        }
                    }
                    Some(Transition::WentOffline) => {
                        cache.engine().set_online(false);
                        println!();
                        warning("Connection lost; start/stop will be queued on this device.");
                    }
                    None => {
                        cache.engine().set_online(online);
                    }
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(l) => {
                        if !run_line(&mut cache, &l).await {
                            break;
                        }
                    }
                    None => break,
                }
                ticker.sync_with(cache.is_running());
            }
            _ = &mut ctrl_c => break,
        }
    }

    println!();
    print_status(cache.engine());
    Ok(())
}

/// Execute one stdin command. Returns false when the loop should end.
async fn run_line(cache: &mut HttpTimerCache, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return true;
    };
    let rest: Vec<&str> = parts.collect();
    let notes = (rest.len() > 1).then(|| rest[1..].join(" "));

    match cmd.to_lowercase().as_str() {
        "start" | "stop" => {
            let Some(job) = rest.first() else {
                warning(format!("Usage: {} <job> [notes]", cmd));
                return true;
            };
            let job_id = match parse_job_id(job) {
                Ok(id) => id,
                Err(e) => {
                    error(e);
                    return true;
                }
            };

            if cmd.eq_ignore_ascii_case("start") {
                match cache.start_timer(job_id, notes).await {
                    Ok(Some(outcome)) => report_outcome("Started", &outcome),
                    Ok(None) => info(format!("Timer already running for job {}.", job_id)),
                    Err(e) => error(e),
                }
            } else {
                let elapsed = cache.tick();
                match cache.stop_timer(job_id, notes).await {
                    Ok(outcome) => {
                        report_outcome("Stopped", &outcome);
                        if let Some(secs) = elapsed {
                            info(format!("Time on job {}: {}", job_id, format_elapsed(secs)));
                        }
                    }
                    Err(e) => error(e),
                }
            }
        }
        "sync" => {
            let report = cache.engine().sync_queue().await;
            report_sync(&report);
            print_status(cache.engine());
        }
        "status" => {
            match (cache.tick(), cache.active()) {
                (Some(secs), Some(timer)) => {
                    info(format!("Job {} running: {}", timer.job_id, format_elapsed(secs)))
                }
                _ => info("No timer running."),
            }
            print_status(cache.engine());
        }
        "help" | "?" => info(HELP),
        "quit" | "exit" | "q" => return false,
        other => warning(format!("Unknown command '{}'. {}", other, HELP)),
    }
    true
}

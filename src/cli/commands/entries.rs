use crate::api::{HttpTimerApi, TimerApi};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::core::session::open_queue;
use crate::errors::{AppError, AppResult};
use crate::models::timer_entry::total_minutes;
use crate::ui::messages::{info, queued};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{bold, mins2readable, truncate};
use crate::utils::table::{Column, Table};
use crate::utils::time::{parse_job_id, to_local_string};
use std::time::Duration;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Entries {
        job,
        export,
        file,
        force,
    } = cmd
    {
        let job_id = parse_job_id(job)?;
        if cfg.offline {
            return Err(AppError::Network(
                "time entries live on the server; not available offline".to_string(),
            ));
        }

        let api = HttpTimerApi::new(&cfg.server_url, Duration::from_secs(cfg.request_timeout_secs))?;
        let entries = api.get_job_timers(job_id).await?;

        if let (Some(format), Some(path)) = (export, file) {
            return ExportLogic::export_entries(job_id, &entries, *format, path, *force);
        }

        if entries.is_empty() {
            info(format!("No time entries for job {}.", job_id));
        } else {
            let mut table = Table::new(vec![
                Column::new("#"),
                Column::new("Technician"),
                Column::new("Start"),
                Column::new("End"),
                Column::new("Duration"),
                Column::new("Notes"),
            ]);
            for (i, e) in entries.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    e.technician_name.clone().unwrap_or_default(),
                    e.start_time.as_ref().map(to_local_string).unwrap_or_default(),
                    colorize_optional(&e.end_time.as_ref().map(to_local_string).unwrap_or("--".into())),
                    mins2readable(e.minutes(), false),
                    truncate(e.notes.as_deref().unwrap_or(""), 40),
                ]);
            }
            println!("{}", table.render());
            println!(
                "Total on job {}: {}",
                job_id,
                bold(&mins2readable(total_minutes(&entries), false))
            );
        }

        let unsynced = open_queue(cfg)?
            .peek_ordered()
            .into_iter()
            .filter(|a| a.job_id == job_id)
            .count();
        if unsynced > 0 {
            queued(format!(
                "{} unsynced action(s) for job {} are not included yet.",
                unsynced, job_id
            ));
        }
    }
    Ok(())
}

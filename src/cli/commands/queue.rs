use super::ask_confirmation;
use crate::cli::parser::{Commands, QueueCommand};
use crate::config::Config;
use crate::core::offline_queue::OfflineQueue;
use crate::core::session::open_queue;
use crate::core::sync_engine::MAX_RETRIES;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};
use crate::utils::colors::{RESET, color_for_retries, colorize_kind};
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};
use crate::utils::time::to_local_string;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Queue { action } = cmd {
        let queue = open_queue(cfg)?;

        match action {
            None | Some(QueueCommand::List) => list(&queue),
            Some(QueueCommand::Remove { id, yes }) => {
                let id = queue.resolve_id(id)?;
                let prompt = match queue.get(&id) {
                    Some(a) => format!(
                        "Remove {} for job {} ({} failed attempts)? It will never reach the server.",
                        a.kind, a.job_id, a.retry_count
                    ),
                    None => format!("Remove queued action {}?", id),
                };
                if !*yes && !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }
                let removed = queue.remove(&id)?;
                success(format!(
                    "Removed {} for job {} ({}).",
                    removed.kind,
                    removed.job_id,
                    removed.short_id()
                ));
            }
            Some(QueueCommand::Clear { yes }) => {
                if queue.is_empty() {
                    info("Offline queue is already empty.");
                    return Ok(());
                }
                let prompt = format!(
                    "Drop all {} queued actions? None of them will reach the server.",
                    queue.len()
                );
                if !*yes && !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }
                let n = queue.clear()?;
                success(format!("Cleared {} queued action(s).", n));
            }
        }
    }
    Ok(())
}

fn list(queue: &OfflineQueue) {
    let actions = queue.peek_ordered();
    if actions.is_empty() {
        success("Offline queue is empty.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("#"),
        Column::new("Id"),
        Column::new("Type"),
        Column::new("Job"),
        Column::new("Technician"),
        Column::new("Queued at"),
        Column::new("Retries"),
        Column::new("Notes"),
    ]);

    for (i, a) in actions.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            a.short_id().to_string(),
            colorize_kind(a.kind.as_str()),
            a.job_id.to_string(),
            a.technician_name.clone(),
            to_local_string(&a.timestamp),
            format!(
                "{}{}{}",
                color_for_retries(a.retry_count, MAX_RETRIES),
                a.retry_count,
                RESET
            ),
            truncate(a.notes.as_deref().unwrap_or(""), 30),
        ]);
    }

    println!("📥 Offline queue ({} action(s), replayed top to bottom):\n", actions.len());
    println!("{}", table.render());

    let stuck = actions.iter().filter(|a| a.retry_count >= MAX_RETRIES).count();
    if stuck > 0 {
        error(format!(
            "{} action(s) failed {} times and block the queue; remove them with `jobtimer queue remove <id>`.",
            stuck, MAX_RETRIES
        ));
    }
}

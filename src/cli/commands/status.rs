use super::{print_status, report_hydration};
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::{bold, format_elapsed};
use crate::utils::time::to_local_string;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let mut session = Session::open(cfg).await?;
    report_hydration(&session.hydration);

    let online = session.cache.engine().is_online();
    println!(
        "👷 {}  ({})",
        bold(session.cache.technician()),
        if online { "online" } else { "offline" }
    );

    match session.cache.tick() {
        Some(secs) => {
            if let Some(timer) = session.cache.active() {
                println!(
                    "⏱  Job {} running since {} | {}",
                    timer.job_id,
                    to_local_string(&timer.start_time),
                    bold(&format_elapsed(secs))
                );
            }
        }
        None => info("No timer running."),
    }

    print_status(session.cache.engine());
    Ok(())
}

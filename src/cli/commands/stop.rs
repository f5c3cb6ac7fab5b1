use super::{print_status, report_hydration, report_outcome};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{HttpTimerCache, Session};
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::parse_job_id;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop { job, notes } = cmd {
        let job_id = parse_job_id(job)?;
        let mut session = Session::open(cfg).await?;
        report_hydration(&session.hydration);

        let elapsed = session.cache.tick();
        let outcome = session.cache.stop_timer(job_id, notes.clone()).await?;
        report_outcome("Stopped", &outcome);
        if let Some(secs) = elapsed {
            info(format!(
                "Time on job {}: {}",
                job_id,
                HttpTimerCache::format_elapsed(secs)
            ));
        }
        print_status(session.cache.engine());
    }
    Ok(())
}

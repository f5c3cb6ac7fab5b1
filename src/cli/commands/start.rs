use super::{print_status, report_hydration, report_outcome};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::parse_job_id;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start { job, notes } = cmd {
        let job_id = parse_job_id(job)?;
        let mut session = Session::open(cfg).await?;
        report_hydration(&session.hydration);

        match session.cache.start_timer(job_id, notes.clone()).await? {
            Some(outcome) => report_outcome("Started", &outcome),
            None => info(format!("Timer already running for job {}.", job_id)),
        }
        print_status(session.cache.engine());
    }
    Ok(())
}

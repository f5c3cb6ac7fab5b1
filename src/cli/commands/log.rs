use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::core::session::open_queue;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, last } = cmd {
        let queue = open_queue(cfg)?;
        LogLogic::print_log(queue.store(), *last)?;
    }

    Ok(())
}

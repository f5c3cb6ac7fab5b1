use super::{print_status, report_sync};
use crate::config::Config;
use crate::core::session::open_engine;
use crate::errors::AppResult;
use crate::ui::messages::warning;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let (engine, _) = open_engine(cfg).await?;

    if !engine.is_online() && !engine.queue().is_empty() {
        warning(format!(
            "Server unreachable at {}; queued actions stay on this device.",
            cfg.server_url
        ));
    }

    let report = engine.sync_queue().await;
    report_sync(&report);
    print_status(&engine);
    Ok(())
}

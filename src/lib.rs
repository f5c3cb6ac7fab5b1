//! jobtimer library root.
//! Exposes the timer synchronization core (cache, offline queue, sync
//! engine, API client), the CLI parser and the high-level run() function.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Start { .. } => cli::commands::start::handle(&cli.command, cfg).await,
        Commands::Stop { .. } => cli::commands::stop::handle(&cli.command, cfg).await,
        Commands::Status => cli::commands::status::handle(cfg).await,
        Commands::Entries { .. } => cli::commands::entries::handle(&cli.command, cfg).await,
        Commands::Sync => cli::commands::sync::handle(cfg).await,
        Commands::Queue { .. } => cli::commands::queue::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Watch => cli::commands::watch::handle(cfg).await,
    }
}

/// Apply global command-line overrides on top of the loaded configuration.
pub fn apply_overrides(cli: &Cli, cfg: &mut Config) {
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(server) = &cli.server {
        cfg.server_url = server.clone();
    }
    if let Some(technician) = &cli.technician {
        cfg.technician = technician.clone();
    }
    if cli.offline {
        cfg.offline = true;
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // configuration is loaded once per run
    let mut cfg = Config::load()?;
    apply_overrides(&cli, &mut cfg);

    // single-threaded: timers, probes and network calls share one event loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(dispatch(&cli, &cfg))
}

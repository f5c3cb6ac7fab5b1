use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (unless in test mode)
///  - the local SQLite store and its migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.technician.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing jobtimer…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);
    if cfg.technician.trim().is_empty() {
        println!("👷 Technician : (not set, use --technician or edit the config)");
    } else {
        println!("👷 Technician : {}", cfg.technician);
    }

    let conn = Connection::open(&db_path)?;
    init_db(&conn)?;

    log::ttlog_quiet(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    println!("🎉 jobtimer initialization completed!");
    Ok(())
}

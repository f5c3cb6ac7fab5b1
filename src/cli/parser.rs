use crate::core::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for jobtimer
#[derive(Parser)]
#[command(
    name = "jobtimer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Technician job timer: start/stop work on a job, even offline, and sync it later",
    long_about = None
)]
pub struct Cli {
    /// Override the local database path (useful for tests or custom stores)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the timer server base URL
    #[arg(global = true, long = "server")]
    pub server: Option<String>,

    /// Override the technician name
    #[arg(global = true, long = "technician", short = 't')]
    pub technician: Option<String>,

    /// Do not contact the server; every action stays queued
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL)
        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Start the timer on a job
    Start {
        /// Job id (e.g. 7 or #7)
        job: String,

        /// Free-text notes sent with the start event
        #[arg(long)]
        notes: Option<String>,
    },

    /// Stop the timer running on a job
    Stop {
        /// Job id (e.g. 7 or #7)
        job: String,

        /// Free-text notes sent with the stop event
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the running timer and the sync state
    Status,

    /// List the recorded time entries of a job
    Entries {
        /// Job id (e.g. 7 or #7)
        job: String,

        /// Export the entries instead of printing them
        #[arg(long, value_enum, requires = "file")]
        export: Option<ExportFormat>,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE", requires = "export")]
        file: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Replay queued actions against the server now
    Sync,

    /// Inspect or repair the offline action queue
    Queue {
        #[command(subcommand)]
        action: Option<QueueCommand>,
    },

    /// Print the internal log
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        /// Only the newest N rows
        #[arg(long = "last", requires = "print")]
        last: Option<usize>,
    },

    /// Keep running: live timer, reconnect sync, and commands on stdin
    Watch,
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List queued actions in replay order
    List,

    /// Remove one queued action (full id or unique prefix)
    Remove {
        id: String,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Remove every queued action
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

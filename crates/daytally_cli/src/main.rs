//! `daytally` command-line entry point.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daytally")]
#[command(about = "Record one value per day and browse it month by month")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config_dir>/daytally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overrides `db_path` from the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Record today's value (1..=9999), replacing any earlier one
    Submit {
        #[arg(short, long)]
        user: String,

        value: String,
    },
    /// Show one month of values
    Show {
        #[arg(short, long)]
        user: String,

        /// Year to show (e.g. 2024); ignored unless a month is given too
        year: Option<String>,

        /// Month to show (1-12)
        month: Option<String>,

        /// Print the month view as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    Add { username: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load_config(cli.config.as_deref())?.resolve(cli.db)?;
    daytally_core::init_logging(&settings.log_level, &settings.log_dir)
        .context("Failed to initialize logging")?;
    let conn = daytally_core::db::open_db(&settings.db_path).with_context(|| {
        format!("Failed to open database {}", settings.db_path.display())
    })?;

    match cli.command {
        Commands::User {
            command: UserCommands::Add { username },
        } => commands::user::add(&conn, &username),
        Commands::Submit { user, value } => commands::submit::run(&conn, &user, &value),
        Commands::Show {
            user,
            year,
            month,
            json,
        } => commands::show::run(&conn, &user, year.as_deref(), month.as_deref(), json),
    }
}

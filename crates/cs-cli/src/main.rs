use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cs_cli::commands::{import, parse, sessions, status};
use cs_cli::{Cli, Commands, Config};
use cs_core::SessionScale;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(cs_db::Database, Config)> {
    let config = load_config(config_path)?;
    ensure_database_dir(&config)?;
    let db = cs_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn ensure_database_dir(config: &Config) -> Result<()> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays a clean table
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Parse(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let transcript = parse::run(args, &config, &mut stdout)?;
            if args.summary {
                let thresholds = config.thresholds(args.gaps.short_gap, args.gaps.long_gap);
                parse::render_summary(&mut io::stderr().lock(), &transcript, thresholds)?;
            }
        }
        Some(Commands::Import(args)) => {
            let config = load_config(cli.config.as_deref())?;
            ensure_database_dir(&config)?;
            let summary = import::run(args, &config)?;
            writeln!(
                stdout,
                "Imported {} events into '{}' ({} short sessions, {} long sessions)",
                summary.events, summary.name, summary.short_sessions, summary.long_sessions
            )?;
        }
        Some(Commands::Sessions { name, long, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            let scale = if *long {
                SessionScale::Long
            } else {
                SessionScale::Short
            };
            sessions::run(&mut stdout, &db, name, scale, *json)?;
        }
        Some(Commands::Status) => {
            let config = load_config(cli.config.as_deref())?;
            ensure_database_dir(&config)?;
            status::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

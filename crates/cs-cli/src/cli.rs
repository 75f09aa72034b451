//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::import::ImportArgs;
use crate::commands::parse::ParseArgs;

/// Chat transcript sessionizer.
///
/// Rebuilds logical messages from an exported chat and splits them into
/// conversation sessions by the gap between messages.
#[derive(Debug, Parser)]
#[command(name = "cs", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process a transcript and write the event table.
    Parse(ParseArgs),

    /// Process a transcript and store it in the database.
    Import(ImportArgs),

    /// Show the sessions of a stored transcript.
    Sessions {
        /// Name the transcript was imported under.
        name: String,

        /// Use the long gap threshold instead of the short one.
        #[arg(long)]
        long: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List stored transcripts.
    Status,
}

/// Session gap overrides shared by commands that run the pipeline.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct GapArgs {
    /// Minutes of silence that end a short session [default: from config, 60].
    #[arg(long, value_name = "MINUTES")]
    pub short_gap: Option<u32>,

    /// Minutes of silence that end a long session [default: from config, 180].
    #[arg(long, value_name = "MINUTES")]
    pub long_gap: Option<u32>,
}

//! Import command for storing a processed transcript in the local `SQLite` store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cs_core::{TranscriptId, UnicodeLexicon, process};
use cs_db::Database;

use crate::Config;
use crate::cli::GapArgs;
use crate::commands::util::{default_transcript_name, read_transcript};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Exported chat file, or `-` for stdin.
    pub input: PathBuf,

    /// Name to store the transcript under [default: input file stem].
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub gaps: GapArgs,
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub name: TranscriptId,
    pub events: usize,
    pub short_sessions: u32,
    pub long_sessions: u32,
}

pub fn run(args: &ImportArgs, config: &Config) -> Result<ImportSummary> {
    let name = args
        .name
        .clone()
        .or_else(|| default_transcript_name(&args.input))
        .ok_or_else(|| anyhow::anyhow!("--name is required when reading from stdin"))?;
    let name = TranscriptId::new(name).context("invalid transcript name")?;

    let lines = read_transcript(&args.input)?;
    let thresholds = config.thresholds(args.gaps.short_gap, args.gaps.long_gap);
    let transcript = process(&lines, &UnicodeLexicon, thresholds);

    let mut db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let events = db
        .replace_transcript(&name, thresholds, &transcript.events)
        .with_context(|| format!("failed to store transcript {name}"))?;

    tracing::info!(transcript = %name, events, "imported transcript");
    Ok(ImportSummary {
        name,
        events,
        short_sessions: transcript.short_session_count(),
        long_sessions: transcript.long_session_count(),
    })
}

//! Parse command: transcript in, event table out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cs_core::{
    SessionScale, SessionThresholds, Transcript, UnicodeLexicon, process, summarize_sessions,
};

use crate::Config;
use crate::cli::GapArgs;
use crate::commands::util::read_transcript;
use crate::output::{OutputFormat, write_events};

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Exported chat file, or `-` for stdin.
    pub input: PathBuf,

    /// Write the table here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Print a session summary to stderr.
    #[arg(long)]
    pub summary: bool,

    #[command(flatten)]
    pub gaps: GapArgs,
}

/// Runs the pipeline and writes the table to `--output` or to `stdout`.
pub fn run<W: Write>(args: &ParseArgs, config: &Config, stdout: &mut W) -> Result<Transcript> {
    let lines = read_transcript(&args.input)?;
    let thresholds = config.thresholds(args.gaps.short_gap, args.gaps.long_gap);
    let transcript = process(&lines, &UnicodeLexicon, thresholds);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_events(BufWriter::new(file), &transcript.events, args.format)?;
        }
        None => write_events(&mut *stdout, &transcript.events, args.format)?,
    }

    tracing::info!(
        input = %args.input.display(),
        events = transcript.events.len(),
        dropped = transcript.stats.leading_lines_dropped,
        duplicates = transcript.stats.duplicates_removed,
        "parsed transcript"
    );
    Ok(transcript)
}

/// Renders a human-readable overview of both session partitions.
pub fn render_summary<W: Write>(
    writer: &mut W,
    transcript: &Transcript,
    thresholds: SessionThresholds,
) -> Result<()> {
    let stats = &transcript.stats;
    writeln!(
        writer,
        "{} events from {} lines ({} leading dropped, {} duplicates removed)",
        transcript.events.len(),
        stats.lines_read,
        stats.leading_lines_dropped,
        stats.duplicates_removed
    )?;
    for scale in [SessionScale::Short, SessionScale::Long] {
        let sessions = summarize_sessions(&transcript.events, scale);
        writeln!(
            writer,
            "{} sessions (gap > {} min): {}",
            scale,
            thresholds.for_scale(scale),
            sessions.len()
        )?;
        for session in &sessions {
            writeln!(
                writer,
                "  #{:<4} {} -> {}  {} messages, {}",
                session.session_id,
                session.started_at.format("%Y-%m-%d %H:%M"),
                session.ended_at.format("%Y-%m-%d %H:%M"),
                session.message_count,
                session.authors.join(", ")
            )?;
        }
    }
    Ok(())
}

//! Event table serialization.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;

use cs_core::Event;

/// Supported event table formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// One JSON object per line.
    Jsonl,
}

/// Column order of the CSV table.
pub const CSV_COLUMNS: [&str; 14] = [
    "id",
    "timestamp",
    "author",
    "text",
    "has_media",
    "has_link",
    "emoji_glyphs",
    "emoji_labels",
    "date",
    "hour",
    "weekday",
    "gap_minutes",
    "session_id_short",
    "session_id_long",
];

/// Writes events in the requested format.
pub fn write_events<W: Write>(writer: W, events: &[Event], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, events),
        OutputFormat::Jsonl => write_jsonl(writer, events),
    }
}

/// Writes events as CSV. Emoji lists are encoded as JSON arrays and a missing
/// gap is an empty cell.
pub fn write_csv<W: Write>(writer: W, events: &[Event]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_COLUMNS)?;
    for event in events {
        let glyphs = serde_json::to_string(&event.emoji_glyphs)?;
        let labels = serde_json::to_string(&event.emoji_labels)?;
        csv.write_record([
            event.id.to_string(),
            event.timestamp_text(),
            event.author.clone(),
            event.text.clone(),
            event.has_media.to_string(),
            event.has_link.to_string(),
            glyphs,
            labels,
            event.date_text(),
            event.hour.to_string(),
            event.weekday.clone(),
            event.gap_minutes.map(|gap| gap.to_string()).unwrap_or_default(),
            event.session_id_short.to_string(),
            event.session_id_long.to_string(),
        ])
        .with_context(|| format!("failed to write event {}", event.id))?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Writes events as JSON lines.
pub fn write_jsonl<W: Write>(mut writer: W, events: &[Event]) -> Result<()> {
    for event in events {
        serde_json::to_writer(&mut writer, event)
            .with_context(|| format!("failed to write event {}", event.id))?;
        writeln!(writer)?;
    }
    writer.flush().context("failed to flush JSON output")?;
    Ok(())
}

//! Status command for showing stored transcripts.

use std::io::Write;

use anyhow::{Context, Result};

use cs_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let transcripts = db.list_transcripts()?;

    writeln!(writer, "Chat sessionizer status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if transcripts.is_empty() {
        writeln!(writer, "No transcripts imported.")?;
        return Ok(());
    }

    writeln!(writer, "Transcripts:")?;
    for t in transcripts {
        let span = match (t.first_event, t.last_event) {
            (Some(first), Some(last)) => format!("{first} .. {last}"),
            _ => "empty".to_string(),
        };
        writeln!(
            writer,
            "- {}: {} events, {} sessions (>{}m), {} sessions (>{}m), {}",
            t.name,
            t.event_count,
            t.short_sessions,
            t.short_gap_minutes,
            t.long_sessions,
            t.long_gap_minutes,
            span
        )?;
    }

    Ok(())
}

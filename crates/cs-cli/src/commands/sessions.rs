//! Sessions command for listing the sessions of a stored transcript.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use cs_core::{SessionScale, TranscriptId};
use cs_db::{Database, SessionRow};

/// Session output for JSON.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    pub session_id: i64,
    pub started_at: String,
    pub ended_at: String,
    pub message_count: i64,
    pub author_count: i64,
    pub media_count: i64,
    pub link_count: i64,
}

impl From<SessionRow> for SessionExport {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            started_at: row.started_at,
            ended_at: row.ended_at,
            message_count: row.message_count,
            author_count: row.author_count,
            media_count: row.media_count,
            link_count: row.link_count,
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    name: &str,
    scale: SessionScale,
    json: bool,
) -> Result<()> {
    let name = TranscriptId::new(name).context("invalid transcript name")?;
    let rows = db.session_summaries(&name, scale)?;

    if json {
        let sessions: Vec<SessionExport> = rows.into_iter().map(SessionExport::from).collect();
        serde_json::to_writer_pretty(&mut *writer, &sessions)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "{name}: {} {scale} sessions", rows.len())?;
    for row in rows {
        writeln!(
            writer,
            "  #{:<4} {} -> {}  {:>4} msgs  {:>2} authors  {} media  {} links",
            row.session_id,
            row.started_at,
            row.ended_at,
            row.message_count,
            row.author_count,
            row.media_count,
            row.link_count
        )?;
    }
    Ok(())
}

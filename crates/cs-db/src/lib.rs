//! Storage layer for processed chat transcripts.
//!
//! Persists sessionized events using `rusqlite`, one row per event keyed by
//! `(transcript, id)`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared across
//! threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Event timestamps are stored as TEXT in `YYYY-MM-DD HH:MM:SS` form. They are
//! naive local times copied from the export, so no timezone is recorded.
//! Lexicographic ordering matches chronological ordering, but rows are always
//! read back in `id` order because that is the transcript's arrival order.
//!
//! ## Emoji Columns
//!
//! `emoji_glyphs` and `emoji_labels` hold JSON arrays of strings of equal length.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use cs_core::{Event, SessionScale, SessionThresholds, TranscriptId};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to encode an emoji column.
    #[error("failed to encode emoji list for event {event_id}")]
    EncodeEmoji {
        event_id: u32,
        #[source]
        source: serde_json::Error,
    },
    /// No transcript is stored under the requested name.
    #[error("unknown transcript: {0}")]
    UnknownTranscript(String),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// An event row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub transcript: String,
    pub id: i64,
    pub timestamp: String,
    pub author: String,
    pub text: String,
    pub has_media: bool,
    pub has_link: bool,
    pub emoji_glyphs: String,
    pub emoji_labels: String,
    pub date: String,
    pub hour: i64,
    pub weekday: String,
    pub gap_minutes: Option<i64>,
    pub session_id_short: i64,
    pub session_id_long: i64,
}

impl EventRecord {
    /// Converts a processed event into a row for the given transcript.
    pub fn from_event(transcript: &TranscriptId, event: &Event) -> Result<Self, DbError> {
        let encode = |list: &[String]| {
            serde_json::to_string(list).map_err(|source| DbError::EncodeEmoji {
                event_id: event.id.value(),
                source,
            })
        };
        Ok(Self {
            transcript: transcript.to_string(),
            id: i64::from(event.id.value()),
            timestamp: event.timestamp_text(),
            author: event.author.clone(),
            text: event.text.clone(),
            has_media: event.has_media,
            has_link: event.has_link,
            emoji_glyphs: encode(&event.emoji_glyphs)?,
            emoji_labels: encode(&event.emoji_labels)?,
            date: event.date_text(),
            hour: i64::from(event.hour),
            weekday: event.weekday.clone(),
            gap_minutes: event.gap_minutes,
            session_id_short: i64::from(event.session_id_short),
            session_id_long: i64::from(event.session_id_long),
        })
    }
}

/// Per-transcript overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub name: String,
    pub imported_at: String,
    pub short_gap_minutes: i64,
    pub long_gap_minutes: i64,
    pub event_count: i64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
    pub short_sessions: i64,
    pub long_sessions: i64,
}

/// Aggregate of one stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub session_id: i64,
    /// Earliest timestamp in the session.
    pub started_at: String,
    /// Latest timestamp in the session.
    pub ended_at: String,
    pub message_count: i64,
    pub author_count: i64,
    pub media_count: i64,
    pub link_count: i64,
}

const SESSIONS_SHORT_SQL: &str = "
    SELECT session_id_short, MIN(timestamp), MAX(timestamp), COUNT(*),
           COUNT(DISTINCT author), SUM(has_media), SUM(has_link)
    FROM events
    WHERE transcript = ?
    GROUP BY session_id_short
    ORDER BY session_id_short ASC
";

const SESSIONS_LONG_SQL: &str = "
    SELECT session_id_long, MIN(timestamp), MAX(timestamp), COUNT(*),
           COUNT(DISTINCT author), SUM(has_media), SUM(has_link)
    FROM events
    WHERE transcript = ?
    GROUP BY session_id_long
    ORDER BY session_id_long ASC
";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS transcripts (
                name TEXT PRIMARY KEY,
                imported_at TEXT NOT NULL,
                short_gap_minutes INTEGER NOT NULL,
                long_gap_minutes INTEGER NOT NULL
            );

            -- Events table: one row per logical message
            -- id: arrival order within the transcript, starting at 0
            -- timestamp: 'YYYY-MM-DD HH:MM:SS', naive local time
            -- emoji_glyphs / emoji_labels: JSON arrays of equal length
            CREATE TABLE IF NOT EXISTS events (
                transcript TEXT NOT NULL,
                id INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                author TEXT NOT NULL,
                text TEXT NOT NULL,
                has_media INTEGER NOT NULL DEFAULT 0,
                has_link INTEGER NOT NULL DEFAULT 0,
                emoji_glyphs TEXT NOT NULL DEFAULT '[]',
                emoji_labels TEXT NOT NULL DEFAULT '[]',
                date TEXT NOT NULL,
                hour INTEGER NOT NULL,
                weekday TEXT NOT NULL,
                gap_minutes INTEGER,
                session_id_short INTEGER NOT NULL,
                session_id_long INTEGER NOT NULL,
                PRIMARY KEY (transcript, id),
                FOREIGN KEY (transcript) REFERENCES transcripts(name) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(transcript, timestamp);
            CREATE INDEX IF NOT EXISTS idx_events_author ON events(transcript, author);
            CREATE INDEX IF NOT EXISTS idx_events_session_short ON events(transcript, session_id_short);
            CREATE INDEX IF NOT EXISTS idx_events_session_long ON events(transcript, session_id_long);
            ",
        )?;
        Ok(())
    }

    /// Stores a transcript's events, replacing anything stored under the same name.
    ///
    /// Runs in a single transaction. Returns the number of event rows written.
    pub fn replace_transcript(
        &mut self,
        name: &TranscriptId,
        thresholds: SessionThresholds,
        events: &[Event],
    ) -> Result<usize, DbError> {
        let records = events
            .iter()
            .map(|event| EventRecord::from_event(name, event))
            .collect::<Result<Vec<_>, _>>()?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transcripts WHERE name = ?", [name.as_str()])?;
        tx.execute(
            "
            INSERT INTO transcripts (name, imported_at, short_gap_minutes, long_gap_minutes)
            VALUES (?, ?, ?, ?)
            ",
            params![
                name.as_str(),
                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                thresholds.short_minutes,
                thresholds.long_minutes,
            ],
        )?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO events
                (transcript, id, timestamp, author, text, has_media, has_link,
                 emoji_glyphs, emoji_labels, date, hour, weekday, gap_minutes,
                 session_id_short, session_id_long)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for record in &records {
                inserted += stmt.execute(params![
                    record.transcript,
                    record.id,
                    record.timestamp,
                    record.author,
                    record.text,
                    record.has_media,
                    record.has_link,
                    record.emoji_glyphs,
                    record.emoji_labels,
                    record.date,
                    record.hour,
                    record.weekday,
                    record.gap_minutes,
                    record.session_id_short,
                    record.session_id_long,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(transcript = %name, inserted, "stored transcript");
        Ok(inserted)
    }

    /// Returns true if a transcript is stored under `name`.
    pub fn has_transcript(&self, name: &TranscriptId) -> Result<bool, DbError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM transcripts WHERE name = ?",
                [name.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Lists a transcript's events in `id` order.
    pub fn list_events(&self, name: &TranscriptId) -> Result<Vec<EventRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT transcript, id, timestamp, author, text, has_media, has_link,
                   emoji_glyphs, emoji_labels, date, hour, weekday, gap_minutes,
                   session_id_short, session_id_long
            FROM events
            WHERE transcript = ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([name.as_str()], |row| {
            Ok(EventRecord {
                transcript: row.get(0)?,
                id: row.get(1)?,
                timestamp: row.get(2)?,
                author: row.get(3)?,
                text: row.get(4)?,
                has_media: row.get(5)?,
                has_link: row.get(6)?,
                emoji_glyphs: row.get(7)?,
                emoji_labels: row.get(8)?,
                date: row.get(9)?,
                hour: row.get(10)?,
                weekday: row.get(11)?,
                gap_minutes: row.get(12)?,
                session_id_short: row.get(13)?,
                session_id_long: row.get(14)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    /// Lists stored transcripts ordered by name.
    pub fn list_transcripts(&self) -> Result<Vec<TranscriptSummary>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT t.name, t.imported_at, t.short_gap_minutes, t.long_gap_minutes,
                   COUNT(e.id), MIN(e.timestamp), MAX(e.timestamp),
                   COALESCE(MAX(e.session_id_short), 0), COALESCE(MAX(e.session_id_long), 0)
            FROM transcripts t
            LEFT JOIN events e ON e.transcript = t.name
            GROUP BY t.name
            ORDER BY t.name ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TranscriptSummary {
                name: row.get(0)?,
                imported_at: row.get(1)?,
                short_gap_minutes: row.get(2)?,
                long_gap_minutes: row.get(3)?,
                event_count: row.get(4)?,
                first_event: row.get(5)?,
                last_event: row.get(6)?,
                short_sessions: row.get(7)?,
                long_sessions: row.get(8)?,
            })
        })?;
        let mut transcripts = Vec::new();
        for row in rows {
            transcripts.push(row?);
        }
        Ok(transcripts)
    }

    /// Aggregates a stored transcript's sessions at the given scale.
    pub fn session_summaries(
        &self,
        name: &TranscriptId,
        scale: SessionScale,
    ) -> Result<Vec<SessionRow>, DbError> {
        if !self.has_transcript(name)? {
            return Err(DbError::UnknownTranscript(name.to_string()));
        }
        let sql = match scale {
            SessionScale::Short => SESSIONS_SHORT_SQL,
            SessionScale::Long => SESSIONS_LONG_SQL,
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([name.as_str()], |row| {
            Ok(SessionRow {
                session_id: row.get(0)?,
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                message_count: row.get(3)?,
                author_count: row.get(4)?,
                media_count: row.get(5)?,
                link_count: row.get(6)?,
            })
        })?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }
}

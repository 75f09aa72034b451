//! Line classification for exported chat transcripts.
//!
//! Every physical line of an export either opens a new message (it carries a
//! timestamp, an author, or both) or continues the message above it. The
//! header grammar is:
//!
//! ```text
//! MM/DD/YY, HH:MM - Name: text
//! ```
//!
//! where the timestamp, the `" - "` separator and the `Name: ` prefix are each
//! optional. Classification never fails: anything that does not look like a
//! header is a continuation.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Header grammar: timestamp, separator, author (lazy, up to the first `": "`), remainder.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d*/\d*/\d{2}, \d*:\d*)?(?: - )?(.+?: )?(.*)$").unwrap()
});

/// Timestamp layout used by the export, minute resolution, no timezone.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y, %H:%M";

/// A classified raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The line starts a new message. At least one of `timestamp` and
    /// `author` is present.
    Header {
        timestamp: Option<NaiveDateTime>,
        author: Option<String>,
        remainder: String,
    },
    /// The line carries no header and belongs to the previous message.
    Continuation(String),
}

impl ParsedLine {
    pub const fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Header { timestamp, .. } => *timestamp,
            Self::Continuation(_) => None,
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Header { author, .. } => author.as_deref(),
            Self::Continuation(_) => None,
        }
    }

    pub fn remainder(&self) -> &str {
        match self {
            Self::Header { remainder, .. } | Self::Continuation(remainder) => remainder,
        }
    }

    pub fn into_remainder(self) -> String {
        match self {
            Self::Header { remainder, .. } | Self::Continuation(remainder) => remainder,
        }
    }

    pub const fn is_continuation(&self) -> bool {
        matches!(self, Self::Continuation(_))
    }
}

/// Classifies one raw line.
///
/// A timestamp that matches the grammar but is not a real calendar time
/// (`13/45/20, 99:99`) turns the whole line into a continuation.
pub fn parse_line(line: &str) -> ParsedLine {
    let Some(caps) = HEADER_RE.captures(line) else {
        return ParsedLine::Continuation(line.to_string());
    };

    let timestamp = match caps.get(1) {
        Some(raw) => match NaiveDateTime::parse_from_str(raw.as_str(), TIMESTAMP_FORMAT) {
            Ok(timestamp) => Some(timestamp),
            Err(err) => {
                tracing::trace!(line, %err, "unparseable timestamp, treating as continuation");
                return ParsedLine::Continuation(line.to_string());
            }
        },
        None => None,
    };

    let author = caps
        .get(2)
        .map(|m| m.as_str().strip_suffix(": ").unwrap_or(m.as_str()).to_string());

    if timestamp.is_none() && author.is_none() {
        return ParsedLine::Continuation(line.to_string());
    }

    ParsedLine::Header {
        timestamp,
        author,
        remainder: caps.get(3).map_or("", |m| m.as_str()).to_string(),
    }
}

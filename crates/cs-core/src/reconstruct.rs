//! Folding classified lines into logical messages.
//!
//! # Algorithm
//!
//! 1. Forward-fill the last seen timestamp and author onto every line. Lines
//!    before both are known form the leading fragment and are dropped.
//! 2. Merge consecutive lines sharing the same `(timestamp, author)` into one
//!    message, joining their text with a single space.
//! 3. Drop later messages whose `(timestamp, author, text)` already appeared.
//! 4. Number the survivors in arrival order.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::header::{ParsedLine, parse_line};
use crate::types::EventId;

/// A logical message before feature annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: EventId,
    pub timestamp: NaiveDateTime,
    pub author: String,
    pub text: String,
}

/// Line accounting for one reconstruction pass.
///
/// `lines_read == blank_lines + leading_lines_dropped + lines_merged`, where
/// `lines_merged` is every line that ended up inside some burst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub leading_lines_dropped: usize,
    pub continuation_lines: usize,
    pub bursts: usize,
    pub duplicates_removed: usize,
}

impl ReconstructStats {
    /// Lines that contributed text to some burst.
    pub const fn lines_merged(&self) -> usize {
        self.lines_read - self.blank_lines - self.leading_lines_dropped
    }
}

/// Output of [`reconstruct`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    pub messages: Vec<Message>,
    pub stats: ReconstructStats,
}

/// A line after forward-fill, owning the fields it inherited.
struct FilledLine {
    timestamp: NaiveDateTime,
    author: String,
    text: String,
}

/// Last header values seen so far, tracked independently.
#[derive(Default)]
struct HeaderState {
    timestamp: Option<NaiveDateTime>,
    author: Option<String>,
}

impl HeaderState {
    /// Absorbs a classified line, returning it filled if both fields are known.
    fn fill(&mut self, line: ParsedLine) -> Option<FilledLine> {
        if let Some(timestamp) = line.timestamp() {
            self.timestamp = Some(timestamp);
        }
        if let Some(author) = line.author() {
            self.author = Some(author.to_string());
        }
        let timestamp = self.timestamp?;
        let author = self.author.clone()?;
        Some(FilledLine {
            timestamp,
            author,
            text: line.into_remainder(),
        })
    }
}

/// An in-progress burst of lines sharing `(timestamp, author)`.
struct Burst {
    timestamp: NaiveDateTime,
    author: String,
    parts: Vec<String>,
}

impl Burst {
    fn start(line: FilledLine) -> Self {
        Self {
            timestamp: line.timestamp,
            author: line.author,
            parts: vec![line.text],
        }
    }

    fn accepts(&self, line: &FilledLine) -> bool {
        self.timestamp == line.timestamp && self.author == line.author
    }

    fn finish(self) -> (NaiveDateTime, String, String) {
        (self.timestamp, self.author, self.parts.join(" "))
    }
}

/// Rebuilds logical messages from raw transcript lines.
///
/// Empty lines are skipped. Never fails: malformed lines degrade to
/// continuations and a headerless prefix is dropped.
pub fn reconstruct<I, S>(lines: I) -> Reconstruction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = ReconstructStats::default();
    let mut state = HeaderState::default();
    let mut bursts: Vec<(NaiveDateTime, String, String)> = Vec::new();
    let mut current: Option<Burst> = None;

    for line in lines {
        let line = line.as_ref();
        stats.lines_read += 1;
        if line.is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        let parsed = parse_line(line);
        let is_continuation = parsed.is_continuation();
        let Some(filled) = state.fill(parsed) else {
            stats.leading_lines_dropped += 1;
            continue;
        };
        if is_continuation {
            stats.continuation_lines += 1;
        }

        current = match current.take() {
            Some(mut burst) if burst.accepts(&filled) => {
                burst.parts.push(filled.text);
                Some(burst)
            }
            previous => {
                if let Some(done) = previous {
                    bursts.push(done.finish());
                }
                Some(Burst::start(filled))
            }
        };
    }
    if let Some(done) = current {
        bursts.push(done.finish());
    }
    stats.bursts = bursts.len();

    let mut seen: HashSet<(NaiveDateTime, String, String)> = HashSet::with_capacity(bursts.len());
    let mut messages = Vec::with_capacity(bursts.len());
    for burst in bursts {
        if !seen.insert(burst.clone()) {
            stats.duplicates_removed += 1;
            continue;
        }
        let (timestamp, author, text) = burst;
        let id = u32::try_from(messages.len()).unwrap_or(u32::MAX);
        messages.push(Message {
            id: EventId::new(id),
            timestamp,
            author,
            text,
        });
    }

    tracing::debug!(
        lines = stats.lines_read,
        dropped = stats.leading_lines_dropped,
        bursts = stats.bursts,
        duplicates = stats.duplicates_removed,
        "reconstructed messages"
    );

    Reconstruction { messages, stats }
}

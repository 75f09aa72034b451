//! Structured chat events, one per logical message.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, SessionScale};

/// Layout for timestamps in tabular output and storage.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout for calendar dates in tabular output and storage.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// A logical message with its derived attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Position in arrival order after deduplication.
    pub id: EventId,
    /// Minute-resolution local time from the export header.
    pub timestamp: NaiveDateTime,
    pub author: String,
    /// Full message body, continuation lines and bursts joined by spaces.
    pub text: String,
    /// The body contains the export's media placeholder.
    pub has_media: bool,
    /// The body contains an `http://` or `https://` URL.
    pub has_link: bool,
    /// Emoji grapheme clusters in order of appearance, repeats included.
    pub emoji_glyphs: Vec<String>,
    /// Label for each glyph in `emoji_glyphs`, same length and order.
    pub emoji_labels: Vec<String>,
    pub date: NaiveDate,
    pub hour: u32,
    /// English weekday name, e.g. `Thursday`.
    pub weekday: String,
    /// Whole minutes since the previous event; `None` for the first one.
    pub gap_minutes: Option<i64>,
    /// Session id at the short gap threshold, starting at 1.
    pub session_id_short: u32,
    /// Session id at the long gap threshold, starting at 1.
    pub session_id_long: u32,
}

impl Event {
    /// Returns the session id for the given partition.
    pub const fn session_id(&self, scale: SessionScale) -> u32 {
        match scale {
            SessionScale::Short => self.session_id_short,
            SessionScale::Long => self.session_id_long,
        }
    }

    pub fn has_emoji(&self) -> bool {
        !self.emoji_glyphs.is_empty()
    }

    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_DISPLAY_FORMAT).to_string()
    }

    pub fn date_text(&self) -> String {
        self.date.format(DATE_DISPLAY_FORMAT).to_string()
    }
}

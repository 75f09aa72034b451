//! Gap-threshold session segmentation.
//!
//! Walks events in `id` order and opens a new session whenever the whole-minute
//! gap to the previous event is strictly greater than the threshold. The first
//! event always opens session 1. The walk is a pure fold over
//! [`SessionState`], run once per threshold.
//!
//! Ordering is by `id` (arrival order), never by timestamp: an export that
//! steps backwards in time produces a negative gap, which continues the
//! current session.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::annotate::gap_minutes;
use crate::event::Event;
use crate::types::SessionScale;

/// Default short session gap in minutes.
pub const DEFAULT_SHORT_GAP_MINUTES: u32 = 60;

/// Default long session gap in minutes.
pub const DEFAULT_LONG_GAP_MINUTES: u32 = 180;

/// The two gap thresholds, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionThresholds {
    pub short_minutes: u32,
    pub long_minutes: u32,
}

impl Default for SessionThresholds {
    fn default() -> Self {
        Self {
            short_minutes: DEFAULT_SHORT_GAP_MINUTES,
            long_minutes: DEFAULT_LONG_GAP_MINUTES,
        }
    }
}

impl SessionThresholds {
    pub const fn for_scale(&self, scale: SessionScale) -> u32 {
        match scale {
            SessionScale::Short => self.short_minutes,
            SessionScale::Long => self.long_minutes,
        }
    }
}

/// Running state of one segmentation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Session id handed to the most recent event; 0 before any event.
    pub counter: u32,
    /// Timestamp of the most recent event.
    pub previous: Option<NaiveDateTime>,
}

impl SessionState {
    /// Consumes one event timestamp and returns the next state with the
    /// session id assigned to that event.
    #[must_use]
    pub fn advance(self, timestamp: NaiveDateTime, threshold_minutes: u32) -> (Self, u32) {
        let starts_session = self
            .previous
            .is_none_or(|prev| gap_minutes(prev, timestamp) > i64::from(threshold_minutes));
        let counter = if starts_session {
            self.counter + 1
        } else {
            self.counter
        };
        (
            Self {
                counter,
                previous: Some(timestamp),
            },
            counter,
        )
    }

    /// Number of sessions opened so far.
    pub const fn session_count(&self) -> u32 {
        self.counter
    }
}

/// Assigns a session id to each timestamp, in the order given.
pub fn assign_sessions<I>(timestamps: I, threshold_minutes: u32) -> Vec<u32>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut state = SessionState::default();
    timestamps
        .into_iter()
        .map(|timestamp| {
            let (next, session_id) = state.advance(timestamp, threshold_minutes);
            state = next;
            session_id
        })
        .collect()
}

/// Fills both session id columns. `events` must be in `id` order.
pub fn apply_sessions(events: &mut [Event], thresholds: SessionThresholds) {
    let short = assign_sessions(events.iter().map(|e| e.timestamp), thresholds.short_minutes);
    let long = assign_sessions(events.iter().map(|e| e.timestamp), thresholds.long_minutes);
    for ((event, short_id), long_id) in events.iter_mut().zip(short).zip(long) {
        event.session_id_short = short_id;
        event.session_id_long = long_id;
    }
    tracing::debug!(
        short_sessions = events.last().map_or(0, |e| e.session_id_short),
        long_sessions = events.last().map_or(0, |e| e.session_id_long),
        "assigned sessions"
    );
}

/// Aggregate view of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: u32,
    /// Timestamp of the first event (by `id`) in the session.
    pub started_at: NaiveDateTime,
    /// Timestamp of the last event (by `id`) in the session.
    pub ended_at: NaiveDateTime,
    pub message_count: usize,
    /// Distinct authors in order of first appearance.
    pub authors: Vec<String>,
}

impl SessionSummary {
    pub fn duration_minutes(&self) -> i64 {
        gap_minutes(self.started_at, self.ended_at)
    }
}

/// Summarizes the sessions of an already sessionized event sequence.
pub fn summarize_sessions(events: &[Event], scale: SessionScale) -> Vec<SessionSummary> {
    let mut summaries: Vec<SessionSummary> = Vec::new();
    for event in events {
        let session_id = event.session_id(scale);
        match summaries.last_mut() {
            Some(current) if current.session_id == session_id => {
                current.ended_at = event.timestamp;
                current.message_count += 1;
                if !current.authors.contains(&event.author) {
                    current.authors.push(event.author.clone());
                }
            }
            _ => summaries.push(SessionSummary {
                session_id,
                started_at: event.timestamp,
                ended_at: event.timestamp,
                message_count: 1,
                authors: vec![event.author.clone()],
            }),
        }
    }
    summaries
}

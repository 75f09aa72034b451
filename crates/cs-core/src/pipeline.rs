//! End-to-end processing of one transcript.

use serde::Serialize;

use crate::annotate::annotate;
use crate::emoji::EmojiLexicon;
use crate::event::Event;
use crate::reconstruct::{ReconstructStats, reconstruct};
use crate::sessionize::{SessionThresholds, apply_sessions};

/// A fully processed transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    /// Events in `id` order.
    pub events: Vec<Event>,
    pub stats: ReconstructStats,
}

impl Transcript {
    /// Number of sessions at the short threshold.
    pub fn short_session_count(&self) -> u32 {
        self.events.last().map_or(0, |e| e.session_id_short)
    }

    /// Number of sessions at the long threshold.
    pub fn long_session_count(&self) -> u32 {
        self.events.last().map_or(0, |e| e.session_id_long)
    }
}

/// Runs reconstruction, annotation and both sessionization passes in order.
pub fn process<I, S, L>(lines: I, lexicon: &L, thresholds: SessionThresholds) -> Transcript
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    L: EmojiLexicon + ?Sized,
{
    let reconstruction = reconstruct(lines);
    let mut events = annotate(reconstruction.messages, lexicon);
    apply_sessions(&mut events, thresholds);

    let transcript = Transcript {
        events,
        stats: reconstruction.stats,
    };
    tracing::debug!(
        events = transcript.events.len(),
        short_sessions = transcript.short_session_count(),
        long_sessions = transcript.long_session_count(),
        "processed transcript"
    );
    transcript
}

//! Core domain logic for the chat transcript sessionizer.
//!
//! This crate turns the lines of an exported chat into structured events:
//! - Header matching: classifying lines as message headers or continuations
//! - Reconstruction: forward-fill, burst merging and deduplication
//! - Annotation: media/link flags, emoji, calendar fields and gaps
//! - Sessionization: gap-threshold session ids at two thresholds

pub mod annotate;
pub mod emoji;
pub mod event;
pub mod header;
mod pipeline;
pub mod reconstruct;
pub mod sessionize;
pub mod types;

pub use emoji::{EmojiLexicon, UnicodeLexicon};
pub use event::Event;
pub use header::{ParsedLine, parse_line};
pub use pipeline::{Transcript, process};
pub use reconstruct::{Message, ReconstructStats, Reconstruction, reconstruct};
pub use sessionize::{
    SessionState, SessionSummary, SessionThresholds, apply_sessions, assign_sessions,
    summarize_sessions,
};
pub use types::{EventId, SessionScale, TranscriptId, ValidationError};

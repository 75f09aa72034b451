//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid session scale value.
    #[error("invalid session scale: {value}")]
    InvalidSessionScale { value: String },
}

/// Position of an event in the final arrival order.
///
/// Assigned once, after deduplication. This is the ordering key for every
/// downstream stage; timestamps are never used to re-sort events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two session partitions to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionScale {
    /// Partition at the short gap threshold (60 minutes by default).
    #[default]
    Short,
    /// Partition at the long gap threshold (180 minutes by default).
    Long,
}

impl SessionScale {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for SessionScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionScale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            _ => Err(ValidationError::InvalidSessionScale {
                value: s.to_string(),
            }),
        }
    }
}

/// A validated transcript name.
///
/// Transcript names must be non-empty after trimming. They key every stored
/// event, so re-importing under the same name replaces the earlier rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TranscriptId(String);

impl TranscriptId {
    /// Creates a new name after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "transcript name",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TranscriptId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TranscriptId> for String {
    fn from(id: TranscriptId) -> Self {
        id.0
    }
}

impl fmt::Display for TranscriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TranscriptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_id_rejects_empty() {
        assert!(TranscriptId::new("").is_err());
        assert!(TranscriptId::new("   ").is_err());
        assert!(TranscriptId::new("family").is_ok());
    }

    #[test]
    fn transcript_id_trims_whitespace() {
        let id = TranscriptId::new("  family chat ").unwrap();
        assert_eq!(id.as_str(), "family chat");
    }

    #[test]
    fn transcript_id_serde_rejects_empty() {
        let result: Result<TranscriptId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn event_id_serializes_as_number() {
        let json = serde_json::to_string(&EventId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn event_id_orders_by_value() {
        assert!(EventId::new(1) < EventId::new(2));
    }

    #[test]
    fn session_scale_from_str() {
        assert_eq!("short".parse::<SessionScale>().unwrap(), SessionScale::Short);
        assert_eq!("long".parse::<SessionScale>().unwrap(), SessionScale::Long);
        let err = "hourly".parse::<SessionScale>().unwrap_err();
        assert_eq!(err.to_string(), "invalid session scale: hourly");
    }

    #[test]
    fn session_scale_as_str() {
        assert_eq!(SessionScale::Short.as_str(), "short");
        assert_eq!(SessionScale::Long.to_string(), "long");
    }
}

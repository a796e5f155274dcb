//! Audit timeline.
//!
//! An append-only, chronologically non-decreasing log of what happened to
//! the schedule, meant for end users rather than operators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// Maximum length of a timeline message.
pub const MAX_ENTRY_LEN: usize = 500;

/// Category of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    System,
    Assignment,
    Rebalancing,
    Conflict,
    Error,
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimelineKind::System => "system",
            TimelineKind::Assignment => "assignment",
            TimelineKind::Rebalancing => "rebalancing",
            TimelineKind::Conflict => "conflict",
            TimelineKind::Error => "error",
        })
    }
}

/// One audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Event category.
    pub kind: TimelineKind,
    /// Human-readable description (1..=500 chars).
    pub entry: String,
}

impl TimelineEntry {
    /// Creates a validated entry.
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: TimelineKind,
        entry: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let entry = entry.into();
        let len = entry.chars().count();
        if len == 0 || len > MAX_ENTRY_LEN {
            return Err(ModelError::InvalidTimelineEntry(format!(
                "message length {len} outside 1..={MAX_ENTRY_LEN}"
            )));
        }
        Ok(Self {
            timestamp,
            kind,
            entry,
        })
    }
}

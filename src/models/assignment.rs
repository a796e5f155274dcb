//! Section assignment model.
//!
//! Every section owns exactly one assignment record, keyed by section id.
//! A record may be fully unassigned, carry only a teacher, or carry a
//! teacher and a room. A room never appears without a teacher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Who teaches a section and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Section this record belongs to.
    pub section_id: String,
    /// Assigned teacher, if any.
    pub teacher_id: Option<String>,
    /// Assigned room, if any. Requires `teacher_id`.
    pub room_id: Option<String>,
    /// When the record was last changed.
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates an unassigned record.
    pub fn unassigned(section_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            section_id: section_id.into(),
            teacher_id: None,
            room_id: None,
            assigned_at: at,
        }
    }

    /// Whether a teacher is set.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.teacher_id.is_some()
    }

    /// Whether the record is assigned to the given teacher.
    #[inline]
    pub fn is_assigned_to(&self, teacher_id: &str) -> bool {
        self.teacher_id.as_deref() == Some(teacher_id)
    }

    /// Sets the teacher and refreshes the timestamp.
    pub(crate) fn set_teacher(&mut self, teacher_id: impl Into<String>, at: DateTime<Utc>) {
        self.teacher_id = Some(teacher_id.into());
        self.assigned_at = at;
    }

    /// Checks the room-implies-teacher rule.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.room_id.is_some() && self.teacher_id.is_none() {
            return Err(ModelError::RoomWithoutTeacher(self.section_id.clone()));
        }
        Ok(())
    }
}

//! Typed results of the manager's mutating operations.
//!
//! Each operation returns `Result<Outcome, Error>`. The error enums are
//! recoverable precondition failures meant to be relayed to an end user:
//! `Display` gives the human-readable reason, `code()` a stable
//! machine-readable one. A failed operation never changes state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RoomFeature;

/// A teacher whose load exceeds their cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overload {
    pub teacher_id: String,
    pub load: f64,
    pub max_load: f64,
}

/// A section whose meetings clash with another section of the same teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub teacher_id: String,
    pub section_id: String,
}

/// Successful [`assign_section`](super::ScheduleManager::assign_section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignOutcome {
    pub section_id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    /// Teacher load before the assignment.
    pub previous_load: f64,
    /// Teacher load after the assignment.
    pub new_load: f64,
    pub max_load: f64,
}

impl AssignOutcome {
    /// `new/max hours`, e.g. `"4.0/8.0 hours"`.
    pub fn load_summary(&self) -> String {
        format!("{:.1}/{:.1} hours", self.new_load, self.max_load)
    }
}

/// Failed [`assign_section`](super::ScheduleManager::assign_section).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    #[error("Section {0} not found")]
    SectionNotFound(String),

    #[error("Section {section_id} is already assigned to {teacher_name}")]
    AlreadyAssigned {
        section_id: String,
        teacher_name: String,
    },

    #[error("Teacher '{0}' not found")]
    TeacherNotFound(String),

    #[error("Teacher {teacher_name} is not qualified to teach {course_code}. Qualified for: {qualified}")]
    NotQualified {
        teacher_name: String,
        course_code: String,
        qualified: String,
    },

    #[error("Assignment would overload teacher {teacher_name} ({resulting_load:.1} > {max_load} hours)")]
    WouldOverload {
        teacher_name: String,
        resulting_load: f64,
        max_load: f64,
    },
}

impl AssignError {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            AssignError::SectionNotFound(_) => "section_not_found",
            AssignError::AlreadyAssigned { .. } => "already_assigned",
            AssignError::TeacherNotFound(_) => "teacher_not_found",
            AssignError::NotQualified { .. } => "not_qualified",
            AssignError::WouldOverload { .. } => "would_overload",
        }
    }
}

/// Successful [`try_swap`](super::ScheduleManager::try_swap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub section_id: String,
    pub from_teacher_id: String,
    pub to_teacher_id: String,
    pub from_teacher_name: String,
    pub to_teacher_name: String,
    /// Receiving teacher's load after the swap.
    pub to_new_load: f64,
}

/// Failed [`try_swap`](super::ScheduleManager::try_swap).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwapError {
    #[error("Section {0} not found")]
    SectionNotFound(String),

    #[error("Teacher {0} not found")]
    TeacherNotFound(String),

    #[error("Section {section_id} is not assigned to teacher {expected} (currently: {})", current.as_deref().unwrap_or("unassigned"))]
    NotAssignedTo {
        section_id: String,
        expected: String,
        current: Option<String>,
    },

    #[error("Teacher {teacher_name} is not qualified to teach {course_code}")]
    NotQualified {
        teacher_name: String,
        course_code: String,
    },

    #[error("Assignment would overload teacher {teacher_name} ({resulting_load:.1} > {max_load} hours)")]
    WouldOverload {
        teacher_name: String,
        resulting_load: f64,
        max_load: f64,
    },
}

impl SwapError {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            SwapError::SectionNotFound(_) => "section_not_found",
            SwapError::TeacherNotFound(_) => "teacher_not_found",
            SwapError::NotAssignedTo { .. } => "not_assigned_to",
            SwapError::NotQualified { .. } => "not_qualified",
            SwapError::WouldOverload { .. } => "would_overload",
        }
    }
}

/// Successful [`assign_room`](super::ScheduleManager::assign_room).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOutcome {
    pub section_id: String,
    pub room_id: String,
    /// Room previously set on the section, if any.
    pub previous_room_id: Option<String>,
}

/// Failed [`assign_room`](super::ScheduleManager::assign_room).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomAssignError {
    #[error("Section {0} not found")]
    SectionNotFound(String),

    #[error("Room {0} not found")]
    RoomNotFound(String),

    #[error("Section {0} has no teacher; assign a teacher before a room")]
    NoTeacher(String),

    #[error("Room {room_id} seats {capacity}, section needs {enrollment}")]
    CapacityTooSmall {
        room_id: String,
        capacity: u32,
        enrollment: u32,
    },

    #[error("Room {room_id} lacks required feature {feature}")]
    MissingFeature {
        room_id: String,
        feature: RoomFeature,
    },
}

impl RoomAssignError {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            RoomAssignError::SectionNotFound(_) => "section_not_found",
            RoomAssignError::RoomNotFound(_) => "room_not_found",
            RoomAssignError::NoTeacher(_) => "no_teacher",
            RoomAssignError::CapacityTooSmall { .. } => "capacity_too_small",
            RoomAssignError::MissingFeature { .. } => "missing_feature",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_summary() {
        let o = AssignOutcome {
            section_id: "CS101-B".into(),
            teacher_id: "t_bob".into(),
            teacher_name: "Bob".into(),
            previous_load: 0.0,
            new_load: 2.0,
            max_load: 12.0,
        };
        assert_eq!(o.load_summary(), "2.0/12.0 hours");
    }

    #[test]
    fn test_messages_and_codes() {
        let e = AssignError::WouldOverload {
            teacher_name: "Alice".into(),
            resulting_load: 14.0,
            max_load: 12.0,
        };
        assert_eq!(
            e.to_string(),
            "Assignment would overload teacher Alice (14.0 > 12 hours)"
        );
        assert_eq!(e.code(), "would_overload");

        let e = SwapError::NotAssignedTo {
            section_id: "CS101-B".into(),
            expected: "t_bob".into(),
            current: None,
        };
        assert!(e.to_string().ends_with("(currently: unassigned)"));
        assert_eq!(e.code(), "not_assigned_to");

        let e = RoomAssignError::MissingFeature {
            room_id: "r101".into(),
            feature: RoomFeature::Computers,
        };
        assert_eq!(e.to_string(), "Room r101 lacks required feature computers");
    }
}

//! Whole-state integrity checks.
//!
//! States built through the `ScheduleState::add_*` methods are valid by
//! construction. States arriving from elsewhere (deserialized snapshots,
//! hand-edited fixtures) are not, so collaborators run [`validate_state`]
//! before handing one to a manager. Detects:
//! - Entities that fail their own invariants
//! - Map keys that disagree with the entity id
//! - Assignments pointing at unknown sections, teachers or rooms
//! - Sections without an assignment record
//! - A room set without a teacher
//! - Timeline entries out of chronological order
//!
//! Every problem is collected; nothing stops at the first one.

use thiserror::Error;

use crate::models::ScheduleState;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An entity violates its own invariants.
    InvalidEntity,
    /// A map key differs from the id of the entity stored under it.
    KeyMismatch,
    /// An assignment references a section that doesn't exist.
    UnknownSection,
    /// An assignment references a teacher that doesn't exist.
    UnknownTeacher,
    /// An assignment references a room that doesn't exist.
    UnknownRoom,
    /// A section has no assignment record.
    MissingAssignment,
    /// An assignment has a room but no teacher.
    RoomWithoutTeacher,
    /// A timeline entry is older than the one before it.
    TimelineOutOfOrder,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a complete schedule state.
///
/// Checks:
/// 1. Every teacher, room and section passes its own validation
/// 2. Every map key equals the id of its entity
/// 3. Every assignment's section, teacher and room exist
/// 4. Every section has an assignment
/// 5. No assignment has a room without a teacher
/// 6. Timeline entries are valid and non-decreasing in time
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_state(state: &ScheduleState) -> ValidationResult {
    use ValidationErrorKind::*;

    let mut errors = Vec::new();

    for (key, teacher) in state.teachers() {
        if key != &teacher.id {
            errors.push(ValidationError::new(
                KeyMismatch,
                format!("Teacher stored under '{key}' has id '{}'", teacher.id),
            ));
        }
        if let Err(e) = teacher.validate() {
            errors.push(ValidationError::new(
                InvalidEntity,
                format!("Teacher '{key}': {e}"),
            ));
        }
    }

    for (key, room) in state.rooms() {
        if key != &room.id {
            errors.push(ValidationError::new(
                KeyMismatch,
                format!("Room stored under '{key}' has id '{}'", room.id),
            ));
        }
        if let Err(e) = room.validate() {
            errors.push(ValidationError::new(InvalidEntity, format!("Room '{key}': {e}")));
        }
    }

    for (key, section) in state.sections() {
        if key != &section.id {
            errors.push(ValidationError::new(
                KeyMismatch,
                format!("Section stored under '{key}' has id '{}'", section.id),
            ));
        }
        if let Err(e) = section.validate() {
            errors.push(ValidationError::new(
                InvalidEntity,
                format!("Section '{key}': {e}"),
            ));
        }
        if state.assignment(key).is_none() {
            errors.push(ValidationError::new(
                MissingAssignment,
                format!("Section '{key}' has no assignment record"),
            ));
        }
    }

    for (key, assignment) in state.assignments() {
        if key != &assignment.section_id {
            errors.push(ValidationError::new(
                KeyMismatch,
                format!(
                    "Assignment stored under '{key}' is for section '{}'",
                    assignment.section_id
                ),
            ));
        }
        if state.section(&assignment.section_id).is_none() {
            errors.push(ValidationError::new(
                UnknownSection,
                format!(
                    "Assignment references unknown section '{}'",
                    assignment.section_id
                ),
            ));
        }
        if let Some(tid) = assignment.teacher_id.as_deref() {
            if state.teacher(tid).is_none() {
                errors.push(ValidationError::new(
                    UnknownTeacher,
                    format!(
                        "Assignment for '{}' references unknown teacher '{tid}'",
                        assignment.section_id
                    ),
                ));
            }
        }
        if let Some(rid) = assignment.room_id.as_deref() {
            if state.room(rid).is_none() {
                errors.push(ValidationError::new(
                    UnknownRoom,
                    format!(
                        "Assignment for '{}' references unknown room '{rid}'",
                        assignment.section_id
                    ),
                ));
            }
        }
        if assignment.validate().is_err() {
            errors.push(ValidationError::new(
                RoomWithoutTeacher,
                format!("Section '{}' has a room but no teacher", assignment.section_id),
            ));
        }
    }

    let timeline = state.timeline();
    for (i, entry) in timeline.iter().enumerate() {
        let len = entry.entry.chars().count();
        if len == 0 || len > crate::models::MAX_ENTRY_LEN {
            errors.push(ValidationError::new(
                InvalidEntity,
                format!("Timeline entry {i} has length {len}"),
            ));
        }
    }
    for (i, pair) in timeline.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            errors.push(ValidationError::new(
                TimelineOutOfOrder,
                format!("Timeline entry {} is older than entry {i}", i + 1),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_state, unbalanced_state};
    use chrono::Utc;
    use serde_json::{json, Value};

    fn tampered(edit: impl FnOnce(&mut Value)) -> ScheduleState {
        let mut value = serde_json::to_value(sample_state(Utc::now()).unwrap()).unwrap();
        edit(&mut value);
        serde_json::from_value(value).unwrap()
    }

    fn kinds(state: &ScheduleState) -> Vec<ValidationErrorKind> {
        validate_state(state)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_built_states_are_valid() {
        assert!(validate_state(&sample_state(Utc::now()).unwrap()).is_ok());
        assert!(validate_state(&unbalanced_state()).is_ok());
        assert!(validate_state(&ScheduleState::new()).is_ok());
    }

    #[test]
    fn test_unknown_teacher_and_room() {
        let state = tampered(|v| {
            v["assignments"]["CS101-A"]["teacher_id"] = json!("t_ghost");
            v["assignments"]["CS102-A"]["room_id"] = json!("r999");
        });
        let k = kinds(&state);
        assert!(k.contains(&ValidationErrorKind::UnknownTeacher));
        assert!(k.contains(&ValidationErrorKind::UnknownRoom));
    }

    #[test]
    fn test_room_without_teacher() {
        let state = tampered(|v| {
            v["assignments"]["CS101-B"]["room_id"] = json!("r101");
        });
        assert_eq!(kinds(&state), vec![ValidationErrorKind::RoomWithoutTeacher]);
    }

    #[test]
    fn test_missing_assignment_and_unknown_section() {
        let state = tampered(|v| {
            let assignments = v["assignments"].as_object_mut().unwrap();
            let record = assignments.remove("MATH201-A").unwrap();
            let mut orphan = record.clone();
            orphan["section_id"] = json!("PHYS-Z");
            assignments.insert("PHYS-Z".into(), orphan);
        });
        let k = kinds(&state);
        assert!(k.contains(&ValidationErrorKind::MissingAssignment));
        assert!(k.contains(&ValidationErrorKind::UnknownSection));
    }

    #[test]
    fn test_invalid_entity_and_key_mismatch() {
        let state = tampered(|v| {
            v["teachers"]["t_bob"]["email"] = json!("not-an-email");
            v["rooms"]["lab1"]["id"] = json!("lab2");
        });
        let k = kinds(&state);
        assert!(k.contains(&ValidationErrorKind::InvalidEntity));
        assert!(k.contains(&ValidationErrorKind::KeyMismatch));
    }

    #[test]
    fn test_lowercase_course_codes() {
        let state = tampered(|v| {
            v["teachers"]["t_bob"]["qualified_courses"] = json!(["cs101"]);
            v["sections"]["MATH201-A"]["course_code"] = json!("math201");
        });
        let errors = validate_state(&state).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidEntity));
    }

    #[test]
    fn test_timeline_out_of_order() {
        let state = tampered(|v| {
            let entries = v["timeline"].as_array_mut().unwrap();
            let mut older = entries[0].clone();
            older["timestamp"] = json!("2000-01-01T00:00:00Z");
            entries.push(older);
        });
        assert_eq!(kinds(&state), vec![ValidationErrorKind::TimelineOutOfOrder]);
    }

    #[test]
    fn test_collects_every_error() {
        let state = tampered(|v| {
            v["assignments"]["CS101-A"]["teacher_id"] = json!("t_ghost");
            v["assignments"]["CS101-B"]["room_id"] = json!("r101");
            v["sections"]["CS102-C"]["enrollment"] = json!(5000);
        });
        let errors = validate_state(&state).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].to_string().starts_with("InvalidEntity:"));
    }
}

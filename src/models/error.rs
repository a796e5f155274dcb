//! Construction-time errors for domain entities.
//!
//! Every entity rejects malformed input outright. Nothing is truncated
//! or clamped into range.

use thiserror::Error;

/// Errors raised while building or registering domain entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A time slot has hours out of range, reversed, or off the quarter-hour grid.
    #[error("invalid time slot: {0}")]
    InvalidTimeSlot(String),

    /// A scalar field is empty, too long, or out of its numeric range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// A course code is empty, longer than 20 chars, or not `[A-Za-z0-9_-]`.
    #[error("invalid course code \"{0}\": must be 1-20 alphanumeric characters with optional hyphens/underscores")]
    InvalidCourseCode(String),

    /// An email address does not look like `local@domain.tld`.
    #[error("invalid email address \"{0}\"")]
    InvalidEmail(String),

    /// A room feature outside the fixed vocabulary.
    #[error("unknown room feature \"{name}\"; valid features: {valid}")]
    UnknownFeature { name: String, valid: String },

    /// Two slots in the same list overlap.
    #[error("overlapping {context} slots: {first} and {second}")]
    OverlappingSlots {
        context: &'static str,
        first: String,
        second: String,
    },

    /// An entity with this id is already registered.
    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: String },

    /// A reference to an entity that does not exist.
    #[error("unknown {entity} referenced: {id}")]
    UnknownReference { entity: &'static str, id: String },

    /// A room is set on an assignment that has no teacher.
    #[error("cannot assign room without teacher (section {0})")]
    RoomWithoutTeacher(String),

    /// A timeline message is empty or longer than 500 chars.
    #[error("invalid timeline entry: {0}")]
    InvalidTimelineEntry(String),
}

/// Checks that `value` has between `min` and `max` characters.
pub(crate) fn check_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ModelError::InvalidField {
            field,
            reason: format!("length {len} outside {min}..={max}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_bounds() {
        assert!(check_len("id", "a", 1, 50).is_ok());
        assert!(check_len("id", "", 1, 50).is_err());
        assert!(check_len("id", &"x".repeat(51), 1, 50).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = ModelError::DuplicateId {
            entity: "teacher",
            id: "t1".into(),
        };
        assert_eq!(e.to_string(), "duplicate teacher id: t1");

        let e = ModelError::RoomWithoutTeacher("CS101-A".into());
        assert!(e.to_string().contains("without teacher"));
    }
}

//! Course section model.
//!
//! A section is one scheduled offering of a course: a course code, one or
//! more weekly meeting slots, an enrollment count, and optionally a room
//! feature it needs.
//!
//! # Weekly hours
//! The load a section contributes to its teacher is the sum of its slot
//! durations.

use serde::{Deserialize, Serialize};

use super::error::check_len;
use super::time_slot::{ensure_disjoint, total_hours};
use super::{ModelError, RoomFeature, TimeSlot};

/// Maximum enrollment of a section.
pub const MAX_ENROLLMENT: u32 = 1000;

/// Normalizes a course code to its canonical (uppercase, trimmed) form.
pub fn normalize_course_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Checks course code format: 1..=20 chars of `[A-Z0-9_-]`.
///
/// Only the normalized form is accepted, so a code that skipped
/// [`normalize_course_code`] (e.g. a deserialized `cs101`) is rejected
/// instead of silently never matching.
pub fn validate_course_code(code: &str) -> Result<(), ModelError> {
    let well_formed = !code.is_empty()
        && code.chars().count() <= 20
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if well_formed {
        Ok(())
    } else {
        Err(ModelError::InvalidCourseCode(code.to_string()))
    }
}

/// A scheduled section of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSection {
    /// Unique section identifier (e.g. `CS101-A`).
    pub id: String,
    /// Normalized course code (e.g. `CS101`).
    pub course_code: String,
    /// Weekly meetings; at least one, pairwise non-overlapping.
    pub timeslots: Vec<TimeSlot>,
    /// Enrolled students, `0..=1000`.
    pub enrollment: u32,
    /// Room feature the section needs, if any.
    pub required_feature: Option<RoomFeature>,
}

impl CourseSection {
    /// Creates a section with no meetings yet.
    ///
    /// The course code is normalized to uppercase.
    pub fn new(id: impl Into<String>, course_code: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            course_code: normalize_course_code(course_code.as_ref()),
            timeslots: Vec::new(),
            enrollment: 0,
            required_feature: None,
        }
    }

    /// Adds a weekly meeting.
    pub fn with_timeslot(mut self, slot: TimeSlot) -> Self {
        self.timeslots.push(slot);
        self
    }

    /// Sets the enrollment.
    pub fn with_enrollment(mut self, enrollment: u32) -> Self {
        self.enrollment = enrollment;
        self
    }

    /// Sets the required room feature.
    pub fn with_required_feature(mut self, feature: RoomFeature) -> Self {
        self.required_feature = Some(feature);
        self
    }

    /// Checks every section invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("section id", &self.id, 1, 50)?;
        validate_course_code(&self.course_code)?;
        if self.enrollment > MAX_ENROLLMENT {
            return Err(ModelError::InvalidField {
                field: "enrollment",
                reason: format!("{} outside 0..={MAX_ENROLLMENT}", self.enrollment),
            });
        }
        if self.timeslots.is_empty() {
            return Err(ModelError::InvalidField {
                field: "timeslots",
                reason: format!("section {} needs at least one timeslot", self.id),
            });
        }
        for slot in &self.timeslots {
            slot.validate()?;
        }
        ensure_disjoint("section", &self.timeslots)
    }

    /// Weekly teaching hours of this section.
    pub fn weekly_hours(&self) -> f64 {
        total_hours(&self.timeslots)
    }

    /// Whether any meeting of this section overlaps any of `slots`.
    pub fn overlaps_any(&self, slots: &[TimeSlot]) -> bool {
        self.timeslots
            .iter()
            .any(|mine| slots.iter().any(|other| mine.overlaps(other)))
    }
}

//! Teacher model.
//!
//! Teachers are the resources sections are assigned to. Each has a weekly
//! load cap, the set of course codes they may teach, and a list of
//! non-overlapping availability slots.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::error::check_len;
use super::section::{normalize_course_code, validate_course_code};
use super::time_slot::{ensure_disjoint, total_hours};
use super::{ModelError, TimeSlot};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Upper bound for `max_load_hours`.
pub const MAX_WEEKLY_LOAD_HOURS: f64 = 40.0;

/// A teacher who can be assigned course sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier (1..=50 chars).
    pub id: String,
    /// Full name (1..=100 chars). Matched case-insensitively by name lookup.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Weekly teaching cap in hours, `(0, 40]`.
    pub max_load_hours: f64,
    /// Normalized (uppercase) course codes this teacher may teach.
    pub qualified_courses: BTreeSet<String>,
    /// Weekly availability; no two slots overlap.
    pub availability: Vec<TimeSlot>,
}

impl Teacher {
    /// Creates a teacher with no qualifications and no availability.
    ///
    /// Call [`validate`](Self::validate) (or register through
    /// `ScheduleState::add_teacher`, which does) before use.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        max_load_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            max_load_hours,
            qualified_courses: BTreeSet::new(),
            availability: Vec::new(),
        }
    }

    /// Adds a course qualification (normalized to uppercase).
    pub fn with_qualification(mut self, course_code: impl AsRef<str>) -> Self {
        self.qualified_courses
            .insert(normalize_course_code(course_code.as_ref()));
        self
    }

    /// Adds several course qualifications.
    pub fn with_qualifications<I, S>(mut self, course_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in course_codes {
            self = self.with_qualification(code);
        }
        self
    }

    /// Adds an availability slot.
    pub fn with_availability(mut self, slot: TimeSlot) -> Self {
        self.availability.push(slot);
        self
    }

    /// Checks every teacher invariant.
    ///
    /// # Errors
    /// The first violated invariant: id/name length, email shape, load cap
    /// range, course code format, slot validity, or overlapping availability.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("teacher id", &self.id, 1, 50)?;
        check_len("teacher name", &self.name, 1, 100)?;
        if !EMAIL.is_match(&self.email) {
            return Err(ModelError::InvalidEmail(self.email.clone()));
        }
        if !(self.max_load_hours > 0.0 && self.max_load_hours <= MAX_WEEKLY_LOAD_HOURS) {
            return Err(ModelError::InvalidField {
                field: "max_load_hours",
                reason: format!("{} outside (0, {MAX_WEEKLY_LOAD_HOURS}]", self.max_load_hours),
            });
        }
        for code in &self.qualified_courses {
            validate_course_code(code)?;
        }
        for slot in &self.availability {
            slot.validate()?;
        }
        ensure_disjoint("availability", &self.availability)
    }

    /// Whether this teacher may teach the given (normalized) course code.
    pub fn is_qualified_for(&self, course_code: &str) -> bool {
        self.qualified_courses.contains(course_code)
    }

    /// Total weekly hours covered by the availability slots.
    pub fn total_availability_hours(&self) -> f64 {
        total_hours(&self.availability)
    }

    /// Comma-separated qualification list, for messages.
    pub fn qualifications_label(&self) -> String {
        self.qualified_courses
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

//! Weekly time slot model.
//!
//! A slot is a day of the week plus a `[start_hour, end_hour)` interval
//! in fractional hours on the quarter-hour grid (9.25 = 09:15).
//!
//! # Overlap
//! Two slots overlap iff they fall on the same day and their intervals
//! intersect. Touching slots (`a.end == b.start`) do not overlap.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO day number (1 = Monday, 7 = Sunday).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Day from its ISO number.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// A weekly teaching interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week.
    pub day: Weekday,
    /// Start hour (inclusive), `0.0..=24.0`.
    pub start_hour: f64,
    /// End hour (exclusive), `0.0..=24.0`, strictly after `start_hour`.
    pub end_hour: f64,
}

impl TimeSlot {
    /// Creates a validated slot.
    ///
    /// # Errors
    /// `ModelError::InvalidTimeSlot` if either hour is outside `[0, 24]`,
    /// not a quarter-hour multiple, or `end_hour <= start_hour`.
    pub fn new(day: Weekday, start_hour: f64, end_hour: f64) -> Result<Self, ModelError> {
        let slot = Self {
            day,
            start_hour,
            end_hour,
        };
        slot.validate()?;
        Ok(slot)
    }

    /// Re-checks the slot invariants (used after deserialization).
    pub fn validate(&self) -> Result<(), ModelError> {
        for (label, hour) in [("start_hour", self.start_hour), ("end_hour", self.end_hour)] {
            if !(0.0..=24.0).contains(&hour) {
                return Err(ModelError::InvalidTimeSlot(format!(
                    "{label} {hour} outside 0..=24"
                )));
            }
            if (hour * 4.0).fract() != 0.0 {
                return Err(ModelError::InvalidTimeSlot(format!(
                    "{label} {hour} is not a quarter-hour increment"
                )));
            }
        }
        if self.end_hour <= self.start_hour {
            return Err(ModelError::InvalidTimeSlot(format!(
                "end_hour {} must be greater than start_hour {}",
                self.end_hour, self.start_hour
            )));
        }
        Ok(())
    }

    /// Length of the slot in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }

    /// Whether two slots overlap (same day, intersecting, not merely touching).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day
            && !(self.end_hour <= other.start_hour || other.end_hour <= self.start_hour)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day.name(),
            clock_time(self.start_hour),
            clock_time(self.end_hour)
        )
    }
}

fn clock_time(hour: f64) -> String {
    let minutes = (hour * 60.0).round() as u32;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Rejects a slot list containing any overlapping pair.
pub(crate) fn ensure_disjoint(context: &'static str, slots: &[TimeSlot]) -> Result<(), ModelError> {
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a.overlaps(b) {
                return Err(ModelError::OverlappingSlots {
                    context,
                    first: a.to_string(),
                    second: b.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Total hours covered by a slot list.
pub(crate) fn total_hours(slots: &[TimeSlot]) -> f64 {
    slots.iter().map(TimeSlot::duration_hours).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Weekday, start: f64, end: f64) -> TimeSlot {
        TimeSlot::new(day, start, end).unwrap()
    }

    #[test]
    fn test_valid_slot() {
        let s = slot(Weekday::Monday, 9.0, 10.75);
        assert!((s.duration_hours() - 1.75).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_reversed_and_empty() {
        assert!(TimeSlot::new(Weekday::Monday, 10.0, 9.0).is_err());
        assert!(TimeSlot::new(Weekday::Monday, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(TimeSlot::new(Weekday::Monday, -1.0, 9.0).is_err());
        assert!(TimeSlot::new(Weekday::Monday, 20.0, 24.25).is_err());
        assert!(TimeSlot::new(Weekday::Monday, 20.0, 24.0).is_ok());
    }

    #[test]
    fn test_rejects_off_grid() {
        let err = TimeSlot::new(Weekday::Monday, 9.1, 10.0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTimeSlot(_)));
        assert!(TimeSlot::new(Weekday::Monday, 9.25, 10.5).is_ok());
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        let a = slot(Weekday::Monday, 9.0, 11.0);
        let b = slot(Weekday::Monday, 11.0, 13.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_same_day() {
        let a = slot(Weekday::Tuesday, 9.0, 11.0);
        let b = slot(Weekday::Tuesday, 10.5, 12.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Containment
        let c = slot(Weekday::Tuesday, 9.5, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_different_days_never_overlap() {
        let a = slot(Weekday::Monday, 9.0, 17.0);
        let b = slot(Weekday::Tuesday, 9.0, 17.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_display() {
        let s = slot(Weekday::Wednesday, 9.25, 10.5);
        assert_eq!(s.to_string(), "Wednesday 09:15-10:30");
    }

    #[test]
    fn test_weekday_numbers() {
        assert_eq!(Weekday::Monday.number(), 1);
        assert_eq!(Weekday::Sunday.number(), 7);
        assert_eq!(Weekday::from_number(3), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_number(0), None);
        assert_eq!(Weekday::from_number(8), None);
    }

    #[test]
    fn test_ensure_disjoint() {
        let ok = vec![
            slot(Weekday::Monday, 9.0, 10.0),
            slot(Weekday::Monday, 10.0, 11.0),
        ];
        assert!(ensure_disjoint("test", &ok).is_ok());

        let bad = vec![
            slot(Weekday::Monday, 9.0, 10.5),
            slot(Weekday::Monday, 10.0, 11.0),
        ];
        assert!(matches!(
            ensure_disjoint("test", &bad),
            Err(ModelError::OverlappingSlots { .. })
        ));
    }
}

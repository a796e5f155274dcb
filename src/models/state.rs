//! Schedule state aggregate.
//!
//! Owns every teacher, room, section and assignment plus the audit
//! timeline. Entities are registered through validating `add_*` methods;
//! there is no deletion, only assignment fields toggling between set and
//! unset.
//!
//! # Invariants
//! - Every section has exactly one assignment, keyed by section id.
//! - Every non-null `teacher_id` / `room_id` refers to a registered entity.
//! - A room is never set without a teacher.
//! - Timeline timestamps never decrease.
//!
//! Maps are ordered by id, which fixes the iteration order every query and
//! rebalancer relies on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    Assignment, CourseSection, ModelError, Room, Teacher, TimelineEntry, TimelineKind,
};

/// The complete in-memory schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    teachers: BTreeMap<String, Teacher>,
    rooms: BTreeMap<String, Room>,
    sections: BTreeMap<String, CourseSection>,
    assignments: BTreeMap<String, Assignment>,
    timeline: Vec<TimelineEntry>,
}

impl ScheduleState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validated teacher.
    pub fn add_teacher(&mut self, teacher: Teacher) -> Result<(), ModelError> {
        teacher.validate()?;
        if self.teachers.contains_key(&teacher.id) {
            return Err(ModelError::DuplicateId {
                entity: "teacher",
                id: teacher.id,
            });
        }
        self.teachers.insert(teacher.id.clone(), teacher);
        Ok(())
    }

    /// Registers a validated room.
    pub fn add_room(&mut self, room: Room) -> Result<(), ModelError> {
        room.validate()?;
        if self.rooms.contains_key(&room.id) {
            return Err(ModelError::DuplicateId {
                entity: "room",
                id: room.id,
            });
        }
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    /// Registers a validated section together with its (unassigned) assignment record.
    pub fn add_section(
        &mut self,
        section: CourseSection,
        at: DateTime<Utc>,
    ) -> Result<(), ModelError> {
        section.validate()?;
        if self.sections.contains_key(&section.id) {
            return Err(ModelError::DuplicateId {
                entity: "section",
                id: section.id,
            });
        }
        self.assignments
            .insert(section.id.clone(), Assignment::unassigned(&section.id, at));
        self.sections.insert(section.id.clone(), section);
        Ok(())
    }

    /// Sets the initial teacher and room of a section.
    ///
    /// Used when loading an existing timetable. Only checks references and
    /// the room-implies-teacher rule; qualification and load are not
    /// enforced here so that inconsistent imported data can be represented
    /// and then reported by the manager's queries.
    pub fn seed_assignment(
        &mut self,
        section_id: &str,
        teacher_id: Option<&str>,
        room_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), ModelError> {
        if let Some(tid) = teacher_id {
            self.require_teacher(tid)?;
        }
        if let Some(rid) = room_id {
            if !self.rooms.contains_key(rid) {
                return Err(ModelError::UnknownReference {
                    entity: "room",
                    id: rid.to_string(),
                });
            }
        }
        let candidate = Assignment {
            section_id: section_id.to_string(),
            teacher_id: teacher_id.map(str::to_string),
            room_id: room_id.map(str::to_string),
            assigned_at: at,
        };
        candidate.validate()?;

        let slot = self
            .assignments
            .get_mut(section_id)
            .ok_or_else(|| ModelError::UnknownReference {
                entity: "section",
                id: section_id.to_string(),
            })?;
        *slot = candidate;
        Ok(())
    }

    /// Appends a timeline entry.
    ///
    /// A timestamp earlier than the last entry is raised to it, so the
    /// timeline stays non-decreasing even if the clock steps back.
    pub fn log(
        &mut self,
        at: DateTime<Utc>,
        kind: TimelineKind,
        message: impl Into<String>,
    ) -> Result<(), ModelError> {
        let at = self.timeline.last().map_or(at, |last| at.max(last.timestamp));
        self.timeline.push(TimelineEntry::new(at, kind, message)?);
        Ok(())
    }

    /// All teachers by id.
    pub fn teachers(&self) -> &BTreeMap<String, Teacher> {
        &self.teachers
    }

    /// All rooms by id.
    pub fn rooms(&self) -> &BTreeMap<String, Room> {
        &self.rooms
    }

    /// All sections by id.
    pub fn sections(&self) -> &BTreeMap<String, CourseSection> {
        &self.sections
    }

    /// All assignments by section id.
    pub fn assignments(&self) -> &BTreeMap<String, Assignment> {
        &self.assignments
    }

    /// The audit timeline, oldest first.
    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.get(id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn section(&self, id: &str) -> Option<&CourseSection> {
        self.sections.get(id)
    }

    pub fn assignment(&self, section_id: &str) -> Option<&Assignment> {
        self.assignments.get(section_id)
    }

    pub(crate) fn assignment_mut(&mut self, section_id: &str) -> Option<&mut Assignment> {
        self.assignments.get_mut(section_id)
    }

    /// Weekly hours currently assigned to a teacher.
    ///
    /// Unknown ids simply have no assigned sections and yield 0.
    pub fn teacher_load(&self, teacher_id: &str) -> f64 {
        self.assignments
            .values()
            .filter(|a| a.is_assigned_to(teacher_id))
            .filter_map(|a| self.sections.get(&a.section_id))
            .map(CourseSection::weekly_hours)
            .sum()
    }

    /// Sum of all teachers' loads.
    pub fn total_assigned_hours(&self) -> f64 {
        self.teachers.keys().map(|id| self.teacher_load(id)).sum()
    }

    /// Ids of sections whose assignment has no teacher, in id order.
    pub fn unassigned_section_ids(&self) -> Vec<&str> {
        self.assignments
            .values()
            .filter(|a| !a.is_assigned())
            .map(|a| a.section_id.as_str())
            .collect()
    }

    fn require_teacher(&self, id: &str) -> Result<(), ModelError> {
        if self.teachers.contains_key(id) {
            Ok(())
        } else {
            Err(ModelError::UnknownReference {
                entity: "teacher",
                id: id.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TimeSlot, Weekday};

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn sample() -> ScheduleState {
        let mut s = ScheduleState::new();
        s.add_teacher(
            Teacher::new("t_alice", "Alice", "alice@university.edu", 8.0)
                .with_qualification("CS101"),
        )
        .unwrap();
        s.add_room(Room::new("r101", 30)).unwrap();
        s.add_section(
            CourseSection::new("CS101-A", "CS101")
                .with_timeslot(TimeSlot::new(Weekday::Monday, 9.0, 11.0).unwrap()),
            now(),
        )
        .unwrap();
        s.add_section(
            CourseSection::new("CS101-B", "CS101")
                .with_timeslot(TimeSlot::new(Weekday::Monday, 11.0, 12.5).unwrap()),
            now(),
        )
        .unwrap();
        s
    }

    #[test]
    fn test_add_section_creates_assignment() {
        let s = sample();
        assert_eq!(s.assignments().len(), 2);
        assert!(!s.assignment("CS101-A").unwrap().is_assigned());
        assert_eq!(s.unassigned_section_ids(), vec!["CS101-A", "CS101-B"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut s = sample();
        let err = s.add_room(Room::new("r101", 10)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateId { entity: "room", .. }));
        let err = s
            .add_teacher(Teacher::new("t_alice", "Other", "o@u.edu", 4.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateId { entity: "teacher", .. }));
    }

    #[test]
    fn test_invalid_entity_rejected_without_partial_write() {
        let mut s = sample();
        let bad = CourseSection::new("BAD", "CS101"); // no timeslots
        assert!(s.add_section(bad, now()).is_err());
        assert!(s.section("BAD").is_none());
        assert!(s.assignment("BAD").is_none());
    }

    #[test]
    fn test_seed_assignment_and_load() {
        let mut s = sample();
        s.seed_assignment("CS101-A", Some("t_alice"), Some("r101"), now())
            .unwrap();
        s.seed_assignment("CS101-B", Some("t_alice"), None, now())
            .unwrap();
        assert!((s.teacher_load("t_alice") - 3.5).abs() < 1e-10);
        assert!((s.total_assigned_hours() - 3.5).abs() < 1e-10);
        assert!(s.unassigned_section_ids().is_empty());
    }

    #[test]
    fn test_seed_assignment_rejects_bad_references() {
        let mut s = sample();
        assert!(matches!(
            s.seed_assignment("CS101-A", Some("t_nobody"), None, now()),
            Err(ModelError::UnknownReference { entity: "teacher", .. })
        ));
        assert!(matches!(
            s.seed_assignment("CS101-A", Some("t_alice"), Some("r999"), now()),
            Err(ModelError::UnknownReference { entity: "room", .. })
        ));
        assert!(matches!(
            s.seed_assignment("NOPE", None, None, now()),
            Err(ModelError::UnknownReference { entity: "section", .. })
        ));
        assert!(matches!(
            s.seed_assignment("CS101-A", None, Some("r101"), now()),
            Err(ModelError::RoomWithoutTeacher(_))
        ));
        // Nothing changed
        assert!(!s.assignment("CS101-A").unwrap().is_assigned());
    }

    #[test]
    fn test_timeline_stays_chronological() {
        let mut s = ScheduleState::new();
        let t1 = now();
        let t0 = t1 - chrono::Duration::minutes(10);
        s.log(t1, TimelineKind::System, "first").unwrap();
        s.log(t0, TimelineKind::System, "clock went back").unwrap();
        let tl = s.timeline();
        assert_eq!(tl.len(), 2);
        assert!(tl[1].timestamp >= tl[0].timestamp);
    }

    #[test]
    fn test_log_rejects_empty_message() {
        let mut s = ScheduleState::new();
        assert!(s.log(now(), TimelineKind::Error, "").is_err());
        assert!(s.timeline().is_empty());
    }

    #[test]
    fn test_state_serde_roundtrip_preserves_equality() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        let back: ScheduleState = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}

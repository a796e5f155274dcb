//! Assign, swap and room transitions.
//!
//! Every transition checks all of its preconditions against the live state
//! before touching it, so a failure leaves the state exactly as it was.

use tracing::info;

use super::{
    AssignError, AssignOutcome, RoomAssignError, RoomOutcome, ScheduleManager, SwapError,
    SwapOutcome,
};
use crate::models::TimelineKind;

impl ScheduleManager {
    /// Assigns an unassigned section to a teacher given by id or name.
    ///
    /// Preconditions, checked in order:
    /// 1. the section exists and has no teacher,
    /// 2. the teacher resolves via [`teacher_name_to_id`](Self::teacher_name_to_id),
    /// 3. the teacher is qualified for the section's course,
    /// 4. the teacher's load plus the section's hours stays within their cap.
    ///
    /// The room is left untouched.
    pub fn assign_section(
        &mut self,
        section_id: &str,
        teacher: &str,
    ) -> Result<AssignOutcome, AssignError> {
        let section = self
            .state
            .section(section_id)
            .ok_or_else(|| AssignError::SectionNotFound(section_id.to_string()))?;
        let assignment = self
            .state
            .assignment(section_id)
            .ok_or_else(|| AssignError::SectionNotFound(section_id.to_string()))?;
        if let Some(current) = assignment.teacher_id.as_deref() {
            let teacher_name = self
                .state
                .teacher(current)
                .map_or_else(|| current.to_string(), |t| t.name.clone());
            return Err(AssignError::AlreadyAssigned {
                section_id: section_id.to_string(),
                teacher_name,
            });
        }

        let teacher = self
            .teacher_name_to_id(teacher)
            .and_then(|id| self.state.teacher(id))
            .ok_or_else(|| AssignError::TeacherNotFound(teacher.to_string()))?;

        if !teacher.is_qualified_for(&section.course_code) {
            return Err(AssignError::NotQualified {
                teacher_name: teacher.name.clone(),
                course_code: section.course_code.clone(),
                qualified: teacher.qualifications_label(),
            });
        }

        let previous_load = self.compute_teacher_load(teacher);
        let new_load = previous_load + section.weekly_hours();
        if new_load > teacher.max_load_hours {
            return Err(AssignError::WouldOverload {
                teacher_name: teacher.name.clone(),
                resulting_load: new_load,
                max_load: teacher.max_load_hours,
            });
        }

        let outcome = AssignOutcome {
            section_id: section.id.clone(),
            teacher_id: teacher.id.clone(),
            teacher_name: teacher.name.clone(),
            previous_load,
            new_load,
            max_load: teacher.max_load_hours,
        };

        let now = self.clock.now();
        if let Some(a) = self.state.assignment_mut(section_id) {
            a.set_teacher(outcome.teacher_id.as_str(), now);
        }
        self.log(
            TimelineKind::Assignment,
            format!("Assigned {} to {}", outcome.section_id, outcome.teacher_name),
        );
        info!(
            section = %outcome.section_id,
            teacher = %outcome.teacher_id,
            load = %outcome.load_summary(),
            "section assigned"
        );
        Ok(outcome)
    }

    /// Moves a section from one teacher to another, both given by id.
    ///
    /// The section must currently belong to `from_teacher_id`. Only the
    /// receiving side is checked: `to_teacher_id` must be qualified and
    /// stay within their cap.
    pub fn try_swap(
        &mut self,
        section_id: &str,
        from_teacher_id: &str,
        to_teacher_id: &str,
    ) -> Result<SwapOutcome, SwapError> {
        let section = self
            .state
            .section(section_id)
            .ok_or_else(|| SwapError::SectionNotFound(section_id.to_string()))?;
        let from = self
            .state
            .teacher(from_teacher_id)
            .ok_or_else(|| SwapError::TeacherNotFound(from_teacher_id.to_string()))?;
        let to = self
            .state
            .teacher(to_teacher_id)
            .ok_or_else(|| SwapError::TeacherNotFound(to_teacher_id.to_string()))?;

        let current = self
            .state
            .assignment(section_id)
            .and_then(|a| a.teacher_id.clone());
        if current.as_deref() != Some(from_teacher_id) {
            return Err(SwapError::NotAssignedTo {
                section_id: section_id.to_string(),
                expected: from_teacher_id.to_string(),
                current,
            });
        }

        if !to.is_qualified_for(&section.course_code) {
            return Err(SwapError::NotQualified {
                teacher_name: to.name.clone(),
                course_code: section.course_code.clone(),
            });
        }

        let to_new_load = self.compute_teacher_load(to) + section.weekly_hours();
        if to_new_load > to.max_load_hours {
            return Err(SwapError::WouldOverload {
                teacher_name: to.name.clone(),
                resulting_load: to_new_load,
                max_load: to.max_load_hours,
            });
        }

        let outcome = SwapOutcome {
            section_id: section.id.clone(),
            from_teacher_id: from.id.clone(),
            to_teacher_id: to.id.clone(),
            from_teacher_name: from.name.clone(),
            to_teacher_name: to.name.clone(),
            to_new_load,
        };

        let now = self.clock.now();
        if let Some(a) = self.state.assignment_mut(section_id) {
            a.set_teacher(outcome.to_teacher_id.as_str(), now);
        }
        self.log(
            TimelineKind::Assignment,
            format!(
                "Swapped {} from {} to {}",
                outcome.section_id, outcome.from_teacher_name, outcome.to_teacher_name
            ),
        );
        info!(
            section = %outcome.section_id,
            from = %outcome.from_teacher_id,
            to = %outcome.to_teacher_id,
            "section swapped"
        );
        Ok(outcome)
    }

    /// [`try_swap`](Self::try_swap) with both teachers given by id or name.
    pub fn swap_by_name(
        &mut self,
        section_id: &str,
        from_teacher: &str,
        to_teacher: &str,
    ) -> Result<SwapOutcome, SwapError> {
        let from = self
            .teacher_name_to_id(from_teacher)
            .ok_or_else(|| SwapError::TeacherNotFound(from_teacher.to_string()))?
            .to_string();
        let to = self
            .teacher_name_to_id(to_teacher)
            .ok_or_else(|| SwapError::TeacherNotFound(to_teacher.to_string()))?
            .to_string();
        self.try_swap(section_id, &from, &to)
    }

    /// Puts a section in a room.
    ///
    /// The section needs a teacher first. The room must seat the section's
    /// enrollment and offer its required feature, if any. Replaces any
    /// room already set.
    pub fn assign_room(
        &mut self,
        section_id: &str,
        room_id: &str,
    ) -> Result<RoomOutcome, RoomAssignError> {
        let section = self
            .state
            .section(section_id)
            .ok_or_else(|| RoomAssignError::SectionNotFound(section_id.to_string()))?;
        let assignment = self
            .state
            .assignment(section_id)
            .ok_or_else(|| RoomAssignError::SectionNotFound(section_id.to_string()))?;
        if !assignment.is_assigned() {
            return Err(RoomAssignError::NoTeacher(section_id.to_string()));
        }
        let room = self
            .state
            .room(room_id)
            .ok_or_else(|| RoomAssignError::RoomNotFound(room_id.to_string()))?;

        if room.capacity < section.enrollment {
            return Err(RoomAssignError::CapacityTooSmall {
                room_id: room.id.clone(),
                capacity: room.capacity,
                enrollment: section.enrollment,
            });
        }
        if let Some(feature) = section.required_feature {
            if !room.has_feature(feature) {
                return Err(RoomAssignError::MissingFeature {
                    room_id: room.id.clone(),
                    feature,
                });
            }
        }

        let outcome = RoomOutcome {
            section_id: section.id.clone(),
            room_id: room.id.clone(),
            previous_room_id: assignment.room_id.clone(),
        };

        if let Some(a) = self.state.assignment_mut(section_id) {
            a.room_id = Some(outcome.room_id.clone());
        }
        self.log(
            TimelineKind::Assignment,
            format!("Placed {} in room {}", outcome.section_id, outcome.room_id),
        );
        info!(section = %outcome.section_id, room = %outcome.room_id, "room assigned");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::fixtures::unbalanced_state;
    use crate::manager::*;
    use crate::models::{CourseSection, RoomFeature, TimeSlot, TimelineKind, Weekday};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn sample() -> ScheduleManager {
        ScheduleManager::with_sample_data().unwrap()
    }

    #[test]
    fn test_assign_section_by_name() {
        let mut m = sample();
        let before = m.state().teacher_load("t_bob");
        let out = m.assign_section("CS101-B", "Bob").unwrap();

        assert_eq!(out.teacher_id, "t_bob");
        assert_eq!(out.teacher_name, "Bob");
        assert!((out.new_load - (before + 2.0)).abs() < 1e-10);
        assert_eq!(out.load_summary(), "2.0/12.0 hours");
        assert!(m.state().assignment("CS101-B").unwrap().is_assigned_to("t_bob"));

        let last = m.state().timeline().last().unwrap();
        assert_eq!(last.kind, TimelineKind::Assignment);
        assert_eq!(last.entry, "Assigned CS101-B to Bob");
    }

    #[test]
    fn test_assign_rejects_double_assignment() {
        let mut m = sample();
        let before = m.get_state();
        let err = m.assign_section("CS101-A", "Bob").unwrap_err();
        assert_eq!(err.code(), "already_assigned");
        assert!(err.to_string().contains("Alice"));
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_assign_preconditions_in_order() {
        let mut m = sample();
        let before = m.get_state();

        let err = m.assign_section("NOPE-1", "Bob").unwrap_err();
        assert_eq!(err, AssignError::SectionNotFound("NOPE-1".into()));

        let err = m.assign_section("CS101-B", "Dave").unwrap_err();
        assert_eq!(err, AssignError::TeacherNotFound("Dave".into()));

        let err = m.assign_section("MATH201-A", "t_bob").unwrap_err();
        assert_eq!(err.code(), "not_qualified");
        assert!(err.to_string().ends_with("Qualified for: CS101, CS102"));

        assert_eq!(m.state(), &before);
    }

    fn with_extra_section(owner: Option<&str>) -> ScheduleManager {
        let mut state = unbalanced_state();
        state
            .add_section(
                CourseSection::new("CS102-C", "CS102")
                    .with_timeslot(TimeSlot::new(Weekday::Thursday, 9.0, 10.0).unwrap()),
                Utc::now(),
            )
            .unwrap();
        state.seed_assignment("CS102-C", owner, None, Utc::now()).unwrap();
        ScheduleManager::new(state)
    }

    #[test]
    fn test_assign_would_overload() {
        // Alice is exactly at her 8h cap
        let mut m = with_extra_section(None);
        let before = m.get_state();
        let err = m.assign_section("CS102-C", "Alice").unwrap_err();
        assert_eq!(
            err,
            AssignError::WouldOverload {
                teacher_name: "Alice".into(),
                resulting_load: 9.0,
                max_load: 8.0,
            }
        );
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_try_swap() {
        let mut m = ScheduleManager::new(unbalanced_state());
        let out = m.try_swap("CS101-A", "t_alice", "t_bob").unwrap();
        assert_eq!(out.to_teacher_name, "Bob");
        assert!((out.to_new_load - 2.0).abs() < 1e-10);
        assert!(m.state().assignment("CS101-A").unwrap().is_assigned_to("t_bob"));
        assert!((m.state().teacher_load("t_alice") - 6.0).abs() < 1e-10);
        assert_eq!(
            m.state().timeline().last().unwrap().entry,
            "Swapped CS101-A from Alice to Bob"
        );
    }

    #[test]
    fn test_try_swap_failures_leave_state() {
        let mut m = ScheduleManager::new(unbalanced_state());
        let before = m.get_state();

        assert_eq!(
            m.try_swap("CS101-A", "t_bob", "t_alice").unwrap_err(),
            SwapError::NotAssignedTo {
                section_id: "CS101-A".into(),
                expected: "t_bob".into(),
                current: Some("t_alice".into()),
            }
        );
        assert_eq!(
            m.try_swap("CS101-A", "t_alice", "t_chen").unwrap_err().code(),
            "not_qualified"
        );
        assert_eq!(
            m.try_swap("CS101-A", "t_alice", "t_zed").unwrap_err(),
            SwapError::TeacherNotFound("t_zed".into())
        );
        assert_eq!(
            m.try_swap("XX", "t_alice", "t_bob").unwrap_err(),
            SwapError::SectionNotFound("XX".into())
        );
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_try_swap_would_overload() {
        let mut m = with_extra_section(Some("t_bob"));
        let before = m.get_state();
        let err = m.try_swap("CS102-C", "t_bob", "t_alice").unwrap_err();
        assert_eq!(err.code(), "would_overload");
        assert_eq!(
            err.to_string(),
            "Assignment would overload teacher Alice (9.0 > 8 hours)"
        );
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_swap_by_name() {
        let mut m = ScheduleManager::new(unbalanced_state());
        let out = m.swap_by_name("CS102-A", "alice", "Bob").unwrap();
        assert_eq!(out.from_teacher_id, "t_alice");
        assert_eq!(out.to_teacher_id, "t_bob");

        let err = m.swap_by_name("CS102-A", "Nobody", "Bob").unwrap_err();
        assert_eq!(err, SwapError::TeacherNotFound("Nobody".into()));
    }

    #[test]
    fn test_swap_refreshes_timestamp() {
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let mut m = ScheduleManager::new(unbalanced_state()).with_clock(clock.clone());

        clock.advance(Duration::hours(1));
        m.try_swap("CS101-A", "t_alice", "t_bob").unwrap();
        let a = m.state().assignment("CS101-A").unwrap();
        assert_eq!(a.assigned_at, start + Duration::hours(1));
    }

    #[test]
    fn test_assign_room() {
        let mut m = sample();
        m.assign_section("CS101-B", "Bob").unwrap();
        let out = m.assign_room("CS101-B", "r101").unwrap();
        assert_eq!(out.previous_room_id, None);
        assert_eq!(
            m.state().assignment("CS101-B").unwrap().room_id.as_deref(),
            Some("r101")
        );
        assert_eq!(
            m.state().timeline().last().unwrap().entry,
            "Placed CS101-B in room r101"
        );
    }

    #[test]
    fn test_assign_room_failures() {
        let mut m = sample();
        let before = m.get_state();

        assert_eq!(
            m.assign_room("MATH201-A", "r101").unwrap_err(),
            RoomAssignError::NoTeacher("MATH201-A".into())
        );
        assert_eq!(
            m.assign_room("CS101-A", "r999").unwrap_err(),
            RoomAssignError::RoomNotFound("r999".into())
        );
        // CS101-A seats 25, lab1 seats 20
        assert_eq!(
            m.assign_room("CS101-A", "lab1").unwrap_err().code(),
            "capacity_too_small"
        );
        // CS102-A needs computers; r101 has only a projector
        assert_eq!(
            m.assign_room("CS102-A", "r101").unwrap_err(),
            RoomAssignError::MissingFeature {
                room_id: "r101".into(),
                feature: RoomFeature::Computers,
            }
        );
        assert_eq!(m.state(), &before);
    }
}

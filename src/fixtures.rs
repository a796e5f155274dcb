//! Seeded sample data.
//!
//! A toy university used for demos and tests: three teachers, two rooms and
//! six sections, with Alice carrying every assigned CS section (8h over
//! four sections) and two sections left open.

use chrono::{DateTime, Utc};

use crate::models::{
    CourseSection, ModelError, Room, RoomFeature, ScheduleState, Teacher, TimeSlot,
    TimelineKind, Weekday,
};

fn slot(day: Weekday, start: f64, end: f64) -> Result<TimeSlot, ModelError> {
    TimeSlot::new(day, start, end)
}

/// Builds the sample university, stamped at `at`.
///
/// | Teacher | Cap | Qualified for |
/// |---------|-----|---------------|
/// | `t_alice` Alice | 12h | CS101, CS102 |
/// | `t_bob` Bob | 12h | CS101, CS102 |
/// | `t_chen` Chen | 12h | MATH201 |
///
/// Alice teaches CS101-A (r101), CS102-A, CS102-B and CS102-C (lab1).
/// CS101-B and MATH201-A are unassigned.
pub fn sample_state(at: DateTime<Utc>) -> Result<ScheduleState, ModelError> {
    use Weekday::*;

    let mut state = ScheduleState::new();

    state.add_teacher(
        Teacher::new("t_alice", "Alice", "alice@university.edu", 12.0)
            .with_qualifications(["CS101", "CS102"])
            .with_availability(slot(Monday, 8.0, 17.0)?)
            .with_availability(slot(Tuesday, 8.0, 17.0)?),
    )?;
    state.add_teacher(
        Teacher::new("t_bob", "Bob", "bob@university.edu", 12.0)
            .with_qualifications(["CS101", "CS102"])
            .with_availability(slot(Monday, 9.0, 15.0)?),
    )?;
    state.add_teacher(
        Teacher::new("t_chen", "Chen", "chen@university.edu", 12.0)
            .with_qualification("MATH201")
            .with_availability(slot(Wednesday, 9.0, 17.0)?),
    )?;

    state.add_room(Room::new("r101", 30).with_feature(RoomFeature::Projector))?;
    state.add_room(
        Room::new("lab1", 20)
            .with_feature(RoomFeature::Computers)
            .with_feature(RoomFeature::Projector),
    )?;

    let sections = [
        ("CS101-A", "CS101", Monday, 9.0, 25, Some(RoomFeature::Projector)),
        ("CS101-B", "CS101", Monday, 11.0, 20, Some(RoomFeature::Projector)),
        ("CS102-A", "CS102", Tuesday, 9.0, 15, Some(RoomFeature::Computers)),
        ("CS102-B", "CS102", Tuesday, 11.0, 18, Some(RoomFeature::Computers)),
        ("CS102-C", "CS102", Tuesday, 13.0, 12, Some(RoomFeature::Computers)),
        ("MATH201-A", "MATH201", Wednesday, 10.0, 30, None),
    ];
    for (id, code, day, start, enrollment, feature) in sections {
        let mut section = CourseSection::new(id, code)
            .with_timeslot(slot(day, start, start + 2.0)?)
            .with_enrollment(enrollment);
        if let Some(feature) = feature {
            section = section.with_required_feature(feature);
        }
        state.add_section(section, at)?;
    }

    for (section, room) in [
        ("CS101-A", "r101"),
        ("CS102-A", "lab1"),
        ("CS102-B", "lab1"),
        ("CS102-C", "lab1"),
    ] {
        state.seed_assignment(section, Some("t_alice"), Some(room), at)?;
    }

    state.log(at, TimelineKind::System, "Scheduling data loaded")?;
    Ok(state)
}

/// The rebalancing scenario: Alice 8h at an 8h cap, Bob idle, Chen 2h.
#[cfg(test)]
pub(crate) fn unbalanced_state() -> ScheduleState {
    use Weekday::*;

    let at = Utc::now();
    let mut state = ScheduleState::new();
    for (id, name, max, courses) in [
        ("t_alice", "Alice", 8.0, &["CS101", "CS102"][..]),
        ("t_bob", "Bob", 8.0, &["CS101", "CS102"][..]),
        ("t_chen", "Chen", 6.0, &["MATH201"][..]),
    ] {
        let email = format!("{}@university.edu", name.to_lowercase());
        state
            .add_teacher(Teacher::new(id, name, email, max).with_qualifications(courses.iter()))
            .unwrap();
    }
    state
        .add_room(Room::new("r101", 30).with_feature(RoomFeature::Projector))
        .unwrap();
    state
        .add_room(Room::new("lab1", 20).with_feature(RoomFeature::Computers))
        .unwrap();

    for (id, code, day, start) in [
        ("CS101-A", "CS101", Monday, 9.0),
        ("CS101-B", "CS101", Monday, 11.0),
        ("CS102-A", "CS102", Tuesday, 9.0),
        ("CS102-B", "CS102", Tuesday, 11.0),
        ("MATH201-A", "MATH201", Wednesday, 10.0),
    ] {
        state
            .add_section(
                CourseSection::new(id, code)
                    .with_timeslot(TimeSlot::new(day, start, start + 2.0).unwrap()),
                at,
            )
            .unwrap();
    }

    for (section, teacher, room) in [
        ("CS101-A", "t_alice", "r101"),
        ("CS101-B", "t_alice", "r101"),
        ("CS102-A", "t_alice", "lab1"),
        ("CS102-B", "t_alice", "lab1"),
        ("MATH201-A", "t_chen", "r101"),
    ] {
        state
            .seed_assignment(section, Some(teacher), Some(room), at)
            .unwrap();
    }
    state
}

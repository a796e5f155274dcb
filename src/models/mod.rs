//! Timetabling domain models.
//!
//! Provides the value objects (time slots, teachers, rooms, sections,
//! assignments, timeline entries) and the [`ScheduleState`] aggregate that
//! owns them. Every entity validates its own invariants; the state refuses
//! to register anything that fails validation.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Training centre |
//! |-------------|-----------|--------|-----------------|
//! | Teacher | Lecturer | Teacher | Instructor |
//! | CourseSection | Course section | Class period | Session |
//! | Room | Lecture hall / lab | Classroom | Training room |
//! | Load | Contact hours | Periods per week | Delivery hours |

mod assignment;
mod error;
mod room;
mod section;
mod state;
mod teacher;
mod time_slot;
mod timeline;

pub use assignment::Assignment;
pub use error::ModelError;
pub use room::{Room, RoomFeature, MAX_ROOM_CAPACITY};
pub use section::{normalize_course_code, validate_course_code, CourseSection, MAX_ENROLLMENT};
pub use state::ScheduleState;
pub use teacher::{Teacher, MAX_WEEKLY_LOAD_HOURS};
pub use time_slot::{TimeSlot, Weekday};
pub use timeline::{TimelineEntry, TimelineKind, MAX_ENTRY_LEN};

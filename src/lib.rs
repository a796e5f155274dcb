//! Teaching-load scheduling engine.
//!
//! Assigns teachers to course sections under qualification, weekly-load
//! and time-conflict constraints, and rebalances assignments to even out
//! teaching load.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeSlot`, `Teacher`, `Room`,
//!   `CourseSection`, `Assignment`, `TimelineEntry`, and the
//!   `ScheduleState` aggregate
//! - **`validation`**: Whole-state integrity checks (references, one
//!   assignment per section, timeline order)
//! - **`manager`**: `ScheduleManager`: load/overload/conflict queries,
//!   assign and swap transitions, reports
//! - **`rebalance`**: Greedy single-pass rebalancer and the 0-1 integer
//!   program behind optimal rebalancing, with a pluggable `Optimizer`
//! - **`clock`**, **`config`**, **`logging`**: time source, TOML engine
//!   settings, tracing setup
//! - **`fixtures`**: a seeded sample university
//!
//! # Example
//!
//! ```
//! use u_timetable::{RebalanceStrategy, ScheduleManager};
//!
//! let mut manager = ScheduleManager::with_sample_data().unwrap();
//! let outcome = manager.assign_section("CS101-B", "Bob").unwrap();
//! assert_eq!(outcome.load_summary(), "2.0/12.0 hours");
//!
//! let report = manager.rebalance(RebalanceStrategy::Greedy, None);
//! assert!(manager.find_overload().is_empty());
//! # let _ = report;
//! ```
//!
//! # Cargo features
//!
//! - **`milp`** (default): `MilpOptimizer` on `good_lp` with the pure-Rust
//!   `microlp` backend. Without it optimal rebalancing degrades to greedy.
//!
//! # References
//!
//! - Pentico (2007), "Assignment problems: A golden anniversary survey"
//! - Williams (2013), "Model Building in Mathematical Programming"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod clock;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod manager;
pub mod models;
pub mod rebalance;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use manager::{
    AssignError, AssignOutcome, Conflict, LoadDistribution, Overload, RoomAssignError,
    RoomOutcome, ScheduleManager, SwapError, SwapOutcome, TeacherLoad,
};
pub use models::{
    Assignment, CourseSection, ModelError, Room, RoomFeature, ScheduleState, Teacher, TimeSlot,
    TimelineEntry, TimelineKind, Weekday,
};
pub use rebalance::{
    default_optimizer, Optimizer, OptimizerError, Reassignment, RebalanceReport,
    RebalanceStrategy, UnavailableOptimizer,
};
#[cfg(feature = "milp")]
pub use rebalance::MilpOptimizer;
pub use validation::{validate_state, ValidationError, ValidationErrorKind, ValidationResult};

//! Schedule manager.
//!
//! [`ScheduleManager`] is the operations layer over one [`ScheduleState`].
//! It owns the state exclusively; callers read it through [`state`] or a
//! [`get_state`] snapshot and change it only through the operations here:
//!
//! - Queries: [`compute_teacher_load`], [`find_overload`],
//!   [`find_conflicting_assignments`], [`teacher_name_to_id`]
//! - Transitions: [`assign_section`], [`try_swap`], [`swap_by_name`],
//!   [`assign_room`]
//! - Rebalancing: [`greedy_rebalance`], [`optimal_rebalance`],
//!   [`rebalance`]
//! - Reports: [`overview`], [`load_distribution`], [`unassigned_sections`]
//!
//! The manager is synchronous and does no locking. Processes sharing one
//! manager across threads serialize access themselves (e.g. a `Mutex`).
//!
//! [`state`]: ScheduleManager::state
//! [`get_state`]: ScheduleManager::get_state
//! [`compute_teacher_load`]: ScheduleManager::compute_teacher_load
//! [`find_overload`]: ScheduleManager::find_overload
//! [`find_conflicting_assignments`]: ScheduleManager::find_conflicting_assignments
//! [`teacher_name_to_id`]: ScheduleManager::teacher_name_to_id
//! [`assign_section`]: ScheduleManager::assign_section
//! [`try_swap`]: ScheduleManager::try_swap
//! [`swap_by_name`]: ScheduleManager::swap_by_name
//! [`assign_room`]: ScheduleManager::assign_room
//! [`greedy_rebalance`]: ScheduleManager::greedy_rebalance
//! [`optimal_rebalance`]: ScheduleManager::optimal_rebalance
//! [`rebalance`]: ScheduleManager::rebalance
//! [`overview`]: ScheduleManager::overview
//! [`load_distribution`]: ScheduleManager::load_distribution
//! [`unassigned_sections`]: ScheduleManager::unassigned_sections

mod outcome;
mod rebalancing;
mod report;
mod transitions;

pub use outcome::{
    AssignError, AssignOutcome, Conflict, Overload, RoomAssignError, RoomOutcome, SwapError,
    SwapOutcome,
};
pub use report::{LoadDistribution, TeacherLoad};

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::fixtures;
use crate::models::{ModelError, ScheduleState, Teacher, TimeSlot, TimelineKind};
use crate::rebalance::{default_optimizer, Optimizer};

/// Operations layer owning one schedule.
#[derive(Debug)]
pub struct ScheduleManager {
    state: ScheduleState,
    clock: Arc<dyn Clock>,
    optimizer: Box<dyn Optimizer>,
    config: EngineConfig,
}

impl ScheduleManager {
    /// Wraps a state with the system clock, the default optimizer and the
    /// default configuration.
    pub fn new(state: ScheduleState) -> Self {
        Self {
            state,
            clock: Arc::new(SystemClock),
            optimizer: default_optimizer(),
            config: EngineConfig::default(),
        }
    }

    /// A manager over the sample university (see [`fixtures::sample_state`]).
    pub fn with_sample_data() -> Result<Self, ModelError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = fixtures::sample_state(clock.now())?;
        Ok(Self::new(state).with_clock(clock))
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the optimizer used by [`optimal_rebalance`](Self::optimal_rebalance).
    pub fn with_optimizer(mut self, optimizer: Box<dyn Optimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Replaces the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Owned snapshot of the live state.
    pub fn get_state(&self) -> ScheduleState {
        self.state.clone()
    }

    /// Consumes the manager, returning its state.
    pub fn into_state(self) -> ScheduleState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    // ======================== Queries ========================

    /// Weekly hours of every section currently assigned to `teacher`.
    pub fn compute_teacher_load(&self, teacher: &Teacher) -> f64 {
        self.state.teacher_load(&teacher.id)
    }

    /// Teachers whose load exceeds their cap, in teacher id order.
    pub fn find_overload(&self) -> Vec<Overload> {
        self.state
            .teachers()
            .values()
            .filter_map(|t| {
                let load = self.compute_teacher_load(t);
                (load > t.max_load_hours).then(|| Overload {
                    teacher_id: t.id.clone(),
                    load,
                    max_load: t.max_load_hours,
                })
            })
            .collect()
    }

    /// Sections that clash with an earlier section of the same teacher.
    ///
    /// Assignments are visited in section id order while each teacher's
    /// slots accumulate. A section is reported once per slot that overlaps
    /// something already accumulated, so the later section of a clashing
    /// pair is the one flagged and a section can appear more than once.
    pub fn find_conflicting_assignments(&self) -> Vec<Conflict> {
        let mut seen: HashMap<&str, Vec<TimeSlot>> = HashMap::new();
        let mut conflicts = Vec::new();

        for assignment in self.state.assignments().values() {
            let Some(teacher_id) = assignment.teacher_id.as_deref() else {
                continue;
            };
            let Some(section) = self.state.section(&assignment.section_id) else {
                continue;
            };
            let slots = seen.entry(teacher_id).or_default();
            for slot in &section.timeslots {
                if slots.iter().any(|s| s.overlaps(slot)) {
                    conflicts.push(Conflict {
                        teacher_id: teacher_id.to_string(),
                        section_id: section.id.clone(),
                    });
                }
            }
            slots.extend(section.timeslots.iter().copied());
        }

        conflicts
    }

    /// Resolves a teacher id or full name to an id.
    ///
    /// An exact id match wins; otherwise the first teacher (id order) whose
    /// name equals `name_or_id` case-insensitively. No partial matching.
    pub fn teacher_name_to_id(&self, name_or_id: &str) -> Option<&str> {
        if let Some((id, _)) = self.state.teachers().get_key_value(name_or_id) {
            return Some(id.as_str());
        }
        let wanted = name_or_id.to_lowercase();
        self.state
            .teachers()
            .values()
            .find(|t| t.name.to_lowercase() == wanted)
            .map(|t| t.id.as_str())
    }

    /// Appends a timeline entry stamped with the clock.
    fn log(&mut self, kind: TimelineKind, message: impl Into<String>) {
        let now = self.clock.now();
        append_log(&mut self.state, now, kind, message);
    }
}

/// Appends a timeline entry; an invalid entry is dropped with a warning.
fn append_log(
    state: &mut ScheduleState,
    at: DateTime<Utc>,
    kind: TimelineKind,
    message: impl Into<String>,
) {
    if let Err(e) = state.log(at, kind, message) {
        warn!(error = %e, "timeline entry dropped");
    }
}

//! Rebalancing entry points.
//!
//! Both strategies run against the live state and return a
//! [`RebalanceReport`]. The optimal strategy builds the whole new
//! assignment on a copy of the state and swaps it in at the end; any
//! optimizer problem (missing backend, infeasible model, solver error) is
//! logged and answered with a greedy pass over the untouched state.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{append_log, ScheduleManager, TeacherLoad};
use crate::models::{ScheduleState, TimelineKind};
use crate::rebalance::{
    GreedyRebalancer, LoadBalanceProblem, Reassignment, RebalanceReport, RebalanceStrategy,
};

impl ScheduleManager {
    /// Single greedy pass (see [`GreedyRebalancer`]).
    ///
    /// `max_load_hours`, when set, caps every receiving teacher instead of
    /// their own `max_load_hours`. An override that is not a positive finite
    /// number is ignored.
    pub fn greedy_rebalance(&mut self, max_load_hours: Option<f64>) -> RebalanceReport {
        let max_load_hours = usable_override(max_load_hours);
        let changes = self.apply_greedy(max_load_hours);
        self.finish(RebalanceStrategy::Greedy, RebalanceStrategy::Greedy, changes)
    }

    /// Solver-based global rebalance (see [`LoadBalanceProblem`]).
    ///
    /// `max_load_hours`, when set, replaces every teacher's cap in the
    /// model; one that is not a positive finite number is ignored. Sections
    /// nobody is qualified for stay with their teacher and count toward
    /// that teacher's cap. Falls back to
    /// [`greedy_rebalance`](Self::greedy_rebalance) when the optimizer is
    /// unavailable or finds no solution.
    pub fn optimal_rebalance(&mut self, max_load_hours: Option<f64>) -> RebalanceReport {
        let max_load_hours = usable_override(max_load_hours);
        let requested = RebalanceStrategy::Optimal;
        let problem = LoadBalanceProblem::from_state(&self.state, max_load_hours);
        if problem.is_empty() {
            return self.finish(requested, requested, Vec::new());
        }

        if !self.optimizer.available() {
            let reason = format!("optimizer '{}' is not available", self.optimizer.name());
            return self.fall_back(&reason, max_load_hours);
        }

        let solution = match self.optimizer.solve(&problem) {
            Ok(solution) => solution,
            Err(e) => return self.fall_back(&e.to_string(), max_load_hours),
        };

        let choices = solution.choices(&problem, self.config.solution_threshold);
        let now = self.clock.now();
        let mut next = self.state.clone();
        let mut changes = Vec::new();

        for (column, choice) in problem.sections.iter().zip(choices) {
            let Some(row) = choice.and_then(|j| problem.teachers.get(j)) else {
                continue;
            };
            let Some(assignment) = next.assignment_mut(&column.section_id) else {
                continue;
            };
            let previous = assignment.teacher_id.clone();
            assignment.set_teacher(row.teacher_id.as_str(), now);

            if previous.as_deref() != Some(row.teacher_id.as_str()) {
                let change = Reassignment {
                    section_id: column.section_id.clone(),
                    from: previous,
                    to: row.teacher_id.clone(),
                    hours: column.hours,
                };
                log_change(&mut next, now, &change);
                changes.push(change);
            }
        }

        self.state = next;
        self.finish(requested, requested, changes)
    }

    /// Runs the given strategy.
    pub fn rebalance(
        &mut self,
        strategy: RebalanceStrategy,
        max_load_hours: Option<f64>,
    ) -> RebalanceReport {
        match strategy {
            RebalanceStrategy::Greedy => self.greedy_rebalance(max_load_hours),
            RebalanceStrategy::Optimal => self.optimal_rebalance(max_load_hours),
        }
    }

    /// Runs the configured default strategy.
    pub fn rebalance_default(&mut self, max_load_hours: Option<f64>) -> RebalanceReport {
        self.rebalance(self.config.default_strategy, max_load_hours)
    }

    fn fall_back(&mut self, reason: &str, max_load_hours: Option<f64>) -> RebalanceReport {
        warn!(reason, "optimal rebalancing unavailable, using greedy");
        self.log(
            TimelineKind::System,
            format!("Optimal rebalancing failed: {reason}. Falling back to greedy rebalancing"),
        );
        let changes = self.apply_greedy(max_load_hours);
        self.finish(RebalanceStrategy::Optimal, RebalanceStrategy::Greedy, changes)
    }

    fn apply_greedy(&mut self, max_load_hours: Option<f64>) -> Vec<Reassignment> {
        let planner = GreedyRebalancer::new().with_slack_hours(self.config.greedy_slack_hours);
        let changes = planner.plan(&self.state, max_load_hours);
        let now = self.clock.now();
        for change in &changes {
            if let Some(a) = self.state.assignment_mut(&change.section_id) {
                a.set_teacher(change.to.as_str(), now);
            }
            log_change(&mut self.state, now, change);
        }
        changes
    }

    fn finish(
        &self,
        requested: RebalanceStrategy,
        applied: RebalanceStrategy,
        changes: Vec<Reassignment>,
    ) -> RebalanceReport {
        info!(
            %requested,
            %applied,
            moved = changes.len(),
            "rebalance finished"
        );
        RebalanceReport {
            requested,
            applied,
            changes,
            loads: TeacherLoad::all(&self.state),
        }
    }
}

/// Drops a cap override that is NaN, infinite or not positive.
fn usable_override(max_load_hours: Option<f64>) -> Option<f64> {
    match max_load_hours {
        Some(m) if !(m.is_finite() && m > 0.0) => {
            warn!(max_load_hours = m, "ignoring invalid load cap override");
            None
        }
        other => other,
    }
}

fn teacher_label(state: &ScheduleState, id: &str) -> String {
    state
        .teacher(id)
        .map_or_else(|| id.to_string(), |t| t.name.clone())
}

fn log_change(state: &mut ScheduleState, at: DateTime<Utc>, change: &Reassignment) {
    let to = teacher_label(state, &change.to);
    let message = match change.from.as_deref() {
        Some(from) => format!(
            "Moved {} from {} to {}",
            change.section_id,
            teacher_label(state, from),
            to
        ),
        None => format!("Assigned {} to {}", change.section_id, to),
    };
    append_log(state, at, TimelineKind::Rebalancing, message);
}

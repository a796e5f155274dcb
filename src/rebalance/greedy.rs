//! Single-pass greedy rebalancer.
//!
//! # Algorithm
//!
//! 1. Snapshot every teacher's load.
//! 2. For each assigned section (section id order), look at every other
//!    teacher qualified for its course.
//! 3. Keep candidates that stay within their cap after taking the section
//!    and whose load is more than `slack_hours` below the current teacher's.
//! 4. Move the section to the candidate with the largest gap, updating the
//!    two tracked loads.
//!
//! Decisions read the tracked loads, never the live state, so planning and
//! applying are separable. The pass is not iterated to a fixed point.
//!
//! # Complexity
//! O(s * t) where s = sections, t = teachers.

use std::collections::BTreeMap;
use tracing::debug;

use super::Reassignment;
use crate::models::ScheduleState;

/// Greedy single-pass planner.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyRebalancer {
    slack_hours: f64,
}

impl Default for GreedyRebalancer {
    fn default() -> Self {
        Self { slack_hours: 2.0 }
    }
}

impl GreedyRebalancer {
    /// Creates a planner with the default 2-hour slack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum load gap required before a move.
    pub fn with_slack_hours(mut self, slack_hours: f64) -> Self {
        self.slack_hours = slack_hours;
        self
    }

    /// Minimum load gap required before a move.
    pub fn slack_hours(&self) -> f64 {
        self.slack_hours
    }

    /// Plans the moves of one pass over `state`.
    ///
    /// `max_load_override`, when set, replaces every target teacher's own
    /// cap. Moves are returned in the order they were decided and must be
    /// applied in that order.
    pub fn plan(&self, state: &ScheduleState, max_load_override: Option<f64>) -> Vec<Reassignment> {
        let mut loads: BTreeMap<&str, f64> = state
            .teachers()
            .keys()
            .map(|id| (id.as_str(), state.teacher_load(id)))
            .collect();
        let mut moves = Vec::new();

        for assignment in state.assignments().values() {
            let Some(current_id) = assignment.teacher_id.as_deref() else {
                continue;
            };
            let (Some(&current_load), Some(section)) =
                (loads.get(current_id), state.section(&assignment.section_id))
            else {
                continue;
            };
            let hours = section.weekly_hours();

            let mut best: Option<&str> = None;
            let mut best_gap = 0.0;
            for (teacher_id, teacher) in state.teachers() {
                if teacher_id == current_id || !teacher.is_qualified_for(&section.course_code) {
                    continue;
                }
                let target_load = loads.get(teacher_id.as_str()).copied().unwrap_or(0.0);
                let cap = max_load_override.unwrap_or(teacher.max_load_hours);
                let gap = current_load - target_load;
                if target_load + hours <= cap && gap > self.slack_hours && gap > best_gap {
                    best = Some(teacher_id.as_str());
                    best_gap = gap;
                }
            }

            if let Some(target_id) = best {
                debug!(
                    section = %section.id,
                    from = current_id,
                    to = target_id,
                    gap = best_gap,
                    "greedy move"
                );
                if let Some(load) = loads.get_mut(current_id) {
                    *load -= hours;
                }
                if let Some(load) = loads.get_mut(target_id) {
                    *load += hours;
                }
                moves.push(Reassignment {
                    section_id: section.id.clone(),
                    from: Some(current_id.to_string()),
                    to: target_id.to_string(),
                    hours,
                });
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::unbalanced_state;
    use crate::models::{CourseSection, Teacher, TimeSlot, Weekday};
    use chrono::Utc;

    #[test]
    fn test_moves_from_heavy_to_idle_teacher() {
        let state = unbalanced_state();
        let moves = GreedyRebalancer::new().plan(&state, None);

        // Alice 8h vs Bob 0h: gap 8 > 2, move CS101-A (Alice 6, Bob 2).
        // Gap 4 > 2: move CS101-B (Alice 4, Bob 4). Gap 0: stop.
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].section_id, "CS101-A");
        assert_eq!(moves[0].to, "t_bob");
        assert_eq!(moves[1].section_id, "CS101-B");
        assert!(moves.iter().all(|m| m.from.as_deref() == Some("t_alice")));
    }

    #[test]
    fn test_slack_blocks_small_gaps() {
        let state = unbalanced_state();
        let moves = GreedyRebalancer::new()
            .with_slack_hours(8.0)
            .plan(&state, None);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_unqualified_teachers_never_receive() {
        let state = unbalanced_state();
        let moves = GreedyRebalancer::new().plan(&state, None);
        assert!(moves.iter().all(|m| m.to != "t_chen"));
    }

    #[test]
    fn test_override_caps_target() {
        let state = unbalanced_state();
        // Bob may take at most 2h under the override.
        let moves = GreedyRebalancer::new().plan(&state, Some(2.0));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, "t_bob");
    }

    #[test]
    fn test_picks_largest_gap() {
        let now = Utc::now();
        let mut state = ScheduleState::new();
        for (id, max) in [("t_a", 20.0), ("t_b", 20.0), ("t_c", 20.0)] {
            state
                .add_teacher(
                    Teacher::new(id, id, format!("{id}@u.edu"), max).with_qualification("CS1"),
                )
                .unwrap();
        }
        let slots = [
            (Weekday::Monday, 8.0),
            (Weekday::Tuesday, 8.0),
            (Weekday::Wednesday, 8.0),
            (Weekday::Thursday, 8.0),
        ];
        for (i, (day, start)) in slots.iter().enumerate() {
            let id = format!("S{i}");
            state
                .add_section(
                    CourseSection::new(&id, "CS1")
                        .with_timeslot(TimeSlot::new(*day, *start, start + 2.0).unwrap()),
                    now,
                )
                .unwrap();
        }
        // a: 6h, b: 2h, c: 0h
        for (sid, tid) in [("S0", "t_a"), ("S1", "t_a"), ("S2", "t_a"), ("S3", "t_b")] {
            state.seed_assignment(sid, Some(tid), None, now).unwrap();
        }

        let moves = GreedyRebalancer::new().plan(&state, None);
        assert_eq!(moves[0].section_id, "S0");
        assert_eq!(moves[0].to, "t_c");
    }

    #[test]
    fn test_empty_state() {
        let moves = GreedyRebalancer::new().plan(&ScheduleState::new(), None);
        assert!(moves.is_empty());
    }
}

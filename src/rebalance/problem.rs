//! Solver-agnostic load-balance formulation.
//!
//! # Model
//!
//! For sections `i` with weekly hours `h_i` and teachers `j`:
//!
//! - `x[i][j] ∈ {0, 1}`: section `i` is taught by teacher `j`. The grid is
//!   dense; pairs where `j` is unqualified are fixed to 0.
//! - Coverage: `Σ_j x[i][j] = 1` for every section with at least one
//!   qualified teacher. Sections nobody can teach stay unconstrained and
//!   keep their current teacher.
//! - Fixed load: `f_j` is the hours of sections nobody can teach that are
//!   already assigned to teacher `j`. They count toward `j`'s load but no
//!   variable moves them.
//! - Capacity: `f_j + Σ_i h_i · x[i][j] <= cap_j`, where `cap_j` is the
//!   override if given, else the teacher's own `max_load_hours`.
//! - Fairness: with `T = (Σ assignable h_i + Σ_j f_j) / |teachers|`,
//!   deviation `d_j >= |load_j - T|` via two linear inequalities, where
//!   `load_j = f_j + Σ_i h_i · x[i][j]`.
//! - Objective: minimize `Σ_j d_j`.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming", Ch. 9.

use serde::{Deserialize, Serialize};

use crate::models::ScheduleState;

/// One section column of the assignment grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionColumn {
    /// Section id.
    pub section_id: String,
    /// Weekly hours.
    pub hours: f64,
    /// `qualified[j]`: whether teacher row `j` may teach this section.
    pub qualified: Vec<bool>,
}

impl SectionColumn {
    /// Whether any teacher may teach this section.
    pub fn is_assignable(&self) -> bool {
        self.qualified.iter().any(|&q| q)
    }
}

/// One teacher row of the assignment grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRow {
    /// Teacher id.
    pub teacher_id: String,
    /// Effective load cap (override or own cap).
    pub capacity: f64,
    /// Hours already held in sections no teacher is qualified for.
    #[serde(default)]
    pub fixed_load: f64,
}

impl TeacherRow {
    /// Hours the model may still place on this teacher.
    pub fn free_capacity(&self) -> f64 {
        self.capacity - self.fixed_load
    }
}

/// The complete model, ready to hand to an [`Optimizer`](super::Optimizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalanceProblem {
    /// Sections, in section id order.
    pub sections: Vec<SectionColumn>,
    /// Teachers, in teacher id order.
    pub teachers: Vec<TeacherRow>,
    /// Mean load per teacher, fixed hours included.
    pub target_load: f64,
}

impl LoadBalanceProblem {
    /// Builds the model for a state.
    pub fn from_state(state: &ScheduleState, max_load_override: Option<f64>) -> Self {
        let mut teachers: Vec<TeacherRow> = state
            .teachers()
            .values()
            .map(|t| TeacherRow {
                teacher_id: t.id.clone(),
                capacity: max_load_override.unwrap_or(t.max_load_hours),
                fixed_load: 0.0,
            })
            .collect();

        let sections: Vec<SectionColumn> = state
            .sections()
            .values()
            .map(|s| SectionColumn {
                section_id: s.id.clone(),
                hours: s.weekly_hours(),
                qualified: state
                    .teachers()
                    .values()
                    .map(|t| t.is_qualified_for(&s.course_code))
                    .collect(),
            })
            .collect();

        for section in sections.iter().filter(|s| !s.is_assignable()) {
            let Some(holder) = state
                .assignment(&section.section_id)
                .and_then(|a| a.teacher_id.as_deref())
            else {
                continue;
            };
            if let Some(row) = teachers.iter_mut().find(|r| r.teacher_id == holder) {
                row.fixed_load += section.hours;
            }
        }

        let assignable_hours: f64 = sections
            .iter()
            .filter(|s| s.is_assignable())
            .map(|s| s.hours)
            .sum();
        let fixed_hours: f64 = teachers.iter().map(|t| t.fixed_load).sum();
        let target_load = if teachers.is_empty() {
            0.0
        } else {
            (assignable_hours + fixed_hours) / teachers.len() as f64
        };

        Self {
            sections,
            teachers,
            target_load,
        }
    }

    /// Whether there is nothing to optimize.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() || self.teachers.is_empty()
    }

    /// Number of binary assignment variables (dense grid).
    pub fn variable_count(&self) -> usize {
        self.sections.len() * self.teachers.len()
    }

    /// Objective value `Σ_j |load_j - T|` of a choice vector.
    ///
    /// `choice[i]` is the teacher row chosen for section column `i`.
    /// Fixed hours are part of every teacher's load.
    pub fn deviation(&self, choice: &[Option<usize>]) -> f64 {
        let mut loads: Vec<f64> = self.teachers.iter().map(|t| t.fixed_load).collect();
        for (section, chosen) in self.sections.iter().zip(choice) {
            if let Some(j) = *chosen {
                if let Some(load) = loads.get_mut(j) {
                    *load += section.hours;
                }
            }
        }
        loads
            .iter()
            .map(|load| (load - self.target_load).abs())
            .sum()
    }
}

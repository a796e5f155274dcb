//! Load reports.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Load | Sum of weekly hours assigned to a teacher |
//! | Utilization | Load / cap, as a percentage |
//! | Mean | Total load / teacher count |
//! | Variance | Population variance of the loads |
//! | Spread | Max load - min load |

use serde::{Deserialize, Serialize};

use super::ScheduleManager;
use crate::models::{CourseSection, ScheduleState};

/// One teacher's load against their cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherLoad {
    pub teacher_id: String,
    pub name: String,
    /// Assigned weekly hours.
    pub load: f64,
    /// Weekly cap.
    pub max_load: f64,
}

impl TeacherLoad {
    /// Load as a percentage of the cap.
    pub fn utilization(&self) -> f64 {
        if self.max_load > 0.0 {
            self.load / self.max_load * 100.0
        } else {
            0.0
        }
    }

    /// Whether the load exceeds the cap.
    pub fn is_overloaded(&self) -> bool {
        self.load > self.max_load
    }

    pub(crate) fn all(state: &ScheduleState) -> Vec<TeacherLoad> {
        state
            .teachers()
            .values()
            .map(|t| TeacherLoad {
                teacher_id: t.id.clone(),
                name: t.name.clone(),
                load: state.teacher_load(&t.id),
                max_load: t.max_load_hours,
            })
            .collect()
    }
}

/// Summary statistics over every teacher's load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDistribution {
    /// Per-teacher loads, in teacher id order.
    pub loads: Vec<TeacherLoad>,
    /// Sum of all loads.
    pub total: f64,
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl LoadDistribution {
    /// Computes the distribution of the given loads.
    ///
    /// An empty input yields all-zero statistics.
    pub fn calculate(loads: Vec<TeacherLoad>) -> Self {
        if loads.is_empty() {
            return Self {
                loads,
                total: 0.0,
                mean: 0.0,
                variance: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let n = loads.len() as f64;
        let total: f64 = loads.iter().map(|l| l.load).sum();
        let mean = total / n;
        let variance = loads.iter().map(|l| (l.load - mean).powi(2)).sum::<f64>() / n;
        let min = loads.iter().map(|l| l.load).fold(f64::INFINITY, f64::min);
        let max = loads.iter().map(|l| l.load).fold(f64::NEG_INFINITY, f64::max);

        Self {
            loads,
            total,
            mean,
            variance,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }

    /// Gap between the most and least loaded teacher.
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

impl ScheduleManager {
    /// Every teacher's load and utilization, in teacher id order.
    pub fn overview(&self) -> Vec<TeacherLoad> {
        TeacherLoad::all(&self.state)
    }

    /// Load statistics across all teachers.
    pub fn load_distribution(&self) -> LoadDistribution {
        LoadDistribution::calculate(self.overview())
    }

    /// Sections without a teacher, in section id order.
    pub fn unassigned_sections(&self) -> Vec<&CourseSection> {
        self.state
            .unassigned_section_ids()
            .into_iter()
            .filter_map(|id| self.state.section(id))
            .collect()
    }
}

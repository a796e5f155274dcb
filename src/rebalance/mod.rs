//! Load rebalancing.
//!
//! Two interchangeable strategies redistribute section→teacher assignments
//! to even out teaching load without breaking qualification or load caps:
//!
//! - **Greedy** ([`GreedyRebalancer`]): a single pass over assigned
//!   sections, moving each to the least-loaded qualified teacher when the
//!   gap exceeds a slack threshold. Fast, local, never backtracks.
//! - **Optimal** ([`LoadBalanceProblem`] + [`Optimizer`]): a 0-1 integer
//!   program minimizing total absolute deviation from the mean load.
//!
//! The optimal strategy needs a solver. Solver absence is an explicit
//! capability ([`Optimizer::available`]); when it is missing, or the model
//! is infeasible, the manager falls back to greedy.
//!
//! # References
//! - Pentico (2007), "Assignment problems: A golden anniversary survey"
//!   (generalized assignment problem)
//! - Williams (2013), "Model Building in Mathematical Programming", Ch. 9
//!   (absolute-value linearization)

mod greedy;
mod optimizer;
mod problem;

pub use greedy::GreedyRebalancer;
#[cfg(feature = "milp")]
pub use optimizer::MilpOptimizer;
pub use optimizer::{
    default_optimizer, BalanceSolution, Optimizer, OptimizerError, UnavailableOptimizer,
};
pub use problem::{LoadBalanceProblem, SectionColumn, TeacherRow};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::manager::TeacherLoad;

/// Rebalancing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceStrategy {
    /// Single-pass heuristic.
    Greedy,
    /// Integer-program global minimization.
    Optimal,
}

impl fmt::Display for RebalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RebalanceStrategy::Greedy => "greedy",
            RebalanceStrategy::Optimal => "optimal",
        })
    }
}

/// One section moving between teachers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reassignment {
    /// Moved section.
    pub section_id: String,
    /// Previous teacher id (`None` if the section was unassigned).
    pub from: Option<String>,
    /// New teacher id.
    pub to: String,
    /// Weekly hours that moved.
    pub hours: f64,
}

/// Outcome of a rebalance call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceReport {
    /// Strategy the caller asked for.
    pub requested: RebalanceStrategy,
    /// Strategy that actually produced the result.
    pub applied: RebalanceStrategy,
    /// Sections whose teacher changed, in section order.
    pub changes: Vec<Reassignment>,
    /// Per-teacher loads after rebalancing.
    pub loads: Vec<TeacherLoad>,
}

impl RebalanceReport {
    /// Whether nothing moved.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether the optimal strategy was requested but greedy ran instead.
    pub fn fell_back(&self) -> bool {
        self.requested == RebalanceStrategy::Optimal && self.applied == RebalanceStrategy::Greedy
    }
}

//! Optimizer capability.
//!
//! An [`Optimizer`] solves a [`LoadBalanceProblem`]. Whether one is usable
//! is an explicit question ([`Optimizer::available`]) rather than a failed
//! import, so the greedy fallback is deterministic and testable.
//!
//! With the `milp` feature, [`MilpOptimizer`] formulates the problem with
//! `good_lp` and solves it with the pure-Rust `microlp` branch-and-bound
//! backend. Solving is synchronous and unbounded in time; callers that need
//! responsiveness run it on a worker thread.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use super::LoadBalanceProblem;

/// Why an optimizer produced no solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// No solver backend is present.
    #[error("no optimization solver available")]
    Unavailable,
    /// The constraints admit no assignment.
    #[error("load-balance model is infeasible")]
    Infeasible,
    /// The backend failed for another reason.
    #[error("solver error: {0}")]
    Solver(String),
}

/// Raw solver output: the value of every `x[i][j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSolution {
    /// `values[i][j]` for section column `i`, teacher row `j`.
    pub values: Vec<Vec<f64>>,
}

impl BalanceSolution {
    /// Teacher row chosen for each section column.
    ///
    /// A variable counts as set when its value exceeds `threshold`. Only
    /// qualified pairs are considered; the first qualified row above the
    /// threshold wins.
    pub fn choices(&self, problem: &LoadBalanceProblem, threshold: f64) -> Vec<Option<usize>> {
        problem
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let row = self.values.get(i)?;
                section
                    .qualified
                    .iter()
                    .zip(row)
                    .position(|(&qualified, &value)| qualified && value > threshold)
            })
            .collect()
    }
}

/// A load-balance solver.
pub trait Optimizer: Send + Sync + Debug {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Whether this optimizer can solve anything at all.
    fn available(&self) -> bool;

    /// Solves the problem to optimality (or best feasible).
    fn solve(&self, problem: &LoadBalanceProblem) -> Result<BalanceSolution, OptimizerError>;
}

/// Stand-in used when no solver is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableOptimizer;

impl Optimizer for UnavailableOptimizer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn available(&self) -> bool {
        false
    }

    fn solve(&self, _problem: &LoadBalanceProblem) -> Result<BalanceSolution, OptimizerError> {
        Err(OptimizerError::Unavailable)
    }
}

/// The best optimizer compiled into this build.
pub fn default_optimizer() -> Box<dyn Optimizer> {
    #[cfg(feature = "milp")]
    {
        Box::new(MilpOptimizer)
    }
    #[cfg(not(feature = "milp"))]
    {
        Box::new(UnavailableOptimizer)
    }
}

#[cfg(feature = "milp")]
pub use milp::MilpOptimizer;

#[cfg(feature = "milp")]
mod milp {
    use good_lp::{
        constraint, variable, Expression, ProblemVariables, ResolutionError, Solution,
        SolverModel, Variable,
    };
    use tracing::debug;

    use super::{BalanceSolution, LoadBalanceProblem, Optimizer, OptimizerError};

    /// Mixed-integer optimizer backed by `good_lp` + `microlp`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct MilpOptimizer;

    impl Optimizer for MilpOptimizer {
        fn name(&self) -> &str {
            "microlp"
        }

        fn available(&self) -> bool {
            true
        }

        fn solve(&self, problem: &LoadBalanceProblem) -> Result<BalanceSolution, OptimizerError> {
            let mut vars = ProblemVariables::new();

            // x[i][j]: dense grid, unqualified pairs pinned to 0
            let x: Vec<Vec<Variable>> = problem
                .sections
                .iter()
                .map(|section| {
                    section
                        .qualified
                        .iter()
                        .map(|&qualified| {
                            if qualified {
                                vars.add(variable().binary())
                            } else {
                                vars.add(variable().integer().min(0.0).max(0.0))
                            }
                        })
                        .collect()
                })
                .collect();

            // d[j] >= |load_j - target|
            let deviations: Vec<Variable> = problem
                .teachers
                .iter()
                .map(|_| vars.add(variable().min(0.0)))
                .collect();

            let objective: Expression = deviations.iter().copied().sum();
            let mut model = vars.minimise(objective).using(good_lp::microlp);

            for (i, section) in problem.sections.iter().enumerate() {
                if !section.is_assignable() {
                    continue;
                }
                let covered: Expression = x[i]
                    .iter()
                    .zip(&section.qualified)
                    .filter(|(_, qualified)| **qualified)
                    .map(|(&var, _)| var)
                    .sum();
                model.add_constraint(constraint!(covered == 1.0));
            }

            let target = problem.target_load;
            for (j, teacher) in problem.teachers.iter().enumerate() {
                let load: Expression = problem
                    .sections
                    .iter()
                    .enumerate()
                    .map(|(i, section)| x[i][j] * section.hours)
                    .sum();
                // Fixed hours shift both the cap and the target of the movable load
                let cap = teacher.free_capacity();
                let movable_target = target - teacher.fixed_load;
                let dev = deviations[j];
                model.add_constraint(constraint!(load.clone() <= cap));
                model.add_constraint(constraint!(dev >= load.clone() - movable_target));
                model.add_constraint(constraint!(load + dev >= movable_target));
            }

            debug!(
                sections = problem.sections.len(),
                teachers = problem.teachers.len(),
                variables = problem.variable_count(),
                target,
                "solving load-balance model"
            );

            let solution = model.solve().map_err(|e| match e {
                ResolutionError::Infeasible => OptimizerError::Infeasible,
                other => OptimizerError::Solver(other.to_string()),
            })?;

            let values = x
                .iter()
                .map(|row| row.iter().map(|&var| solution.value(var)).collect())
                .collect();
            Ok(BalanceSolution { values })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::unbalanced_state;

    #[test]
    fn test_unavailable_optimizer() {
        let p = LoadBalanceProblem::from_state(&unbalanced_state(), None);
        let opt = UnavailableOptimizer;
        assert!(!opt.available());
        assert_eq!(opt.solve(&p), Err(OptimizerError::Unavailable));
    }

    #[test]
    fn test_choices_threshold_and_qualification() {
        let p = LoadBalanceProblem::from_state(&unbalanced_state(), None);
        // Rows: alice, bob, chen. Columns: CS101-A, CS101-B, CS102-A, CS102-B, MATH201-A
        let solution = BalanceSolution {
            values: vec![
                vec![0.99, 0.0, 0.0],
                vec![0.0, 0.51, 0.0],
                vec![0.4, 0.0, 0.0],
                // chen unqualified for CS102: ignored even above threshold
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0],
            ],
        };
        let choices = solution.choices(&p, 0.5);
        assert_eq!(choices, vec![Some(0), Some(1), None, None, Some(2)]);
    }

    #[test]
    fn test_default_optimizer_matches_feature() {
        let opt = default_optimizer();
        assert_eq!(opt.available(), cfg!(feature = "milp"));
    }

    #[cfg(feature = "milp")]
    #[test]
    fn test_milp_balances_scenario() {
        let p = LoadBalanceProblem::from_state(&unbalanced_state(), None);
        let solution = MilpOptimizer.solve(&p).unwrap();
        let choices = solution.choices(&p, 0.5);
        assert!(choices.iter().all(Option::is_some));

        let t = 10.0 / 3.0;
        let optimum = 2.0 * (4.0 - t) + (t - 2.0);
        assert!((p.deviation(&choices) - optimum).abs() < 1e-6);
    }

    #[cfg(feature = "milp")]
    #[test]
    fn test_milp_infeasible_override() {
        // 8h of CS work across two CS teachers capped at 1h each
        let p = LoadBalanceProblem::from_state(&unbalanced_state(), Some(1.0));
        assert!(MilpOptimizer.solve(&p).is_err());
    }
}

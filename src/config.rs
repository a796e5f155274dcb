//! Engine configuration.
//!
//! Tunables of the rebalancers, loadable from TOML. Every field has a
//! default, so an empty document yields [`EngineConfig::default`].
//!
//! ```
//! use u_timetable::config::EngineConfig;
//! use u_timetable::rebalance::RebalanceStrategy;
//!
//! let cfg = EngineConfig::from_toml_str(r#"
//!     greedy_slack_hours = 1.5
//!     default_strategy = "greedy"
//! "#).unwrap();
//! assert_eq!(cfg.default_strategy, RebalanceStrategy::Greedy);
//! assert!((cfg.solution_threshold - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rebalance::RebalanceStrategy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Rebalancer tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum load gap (hours) between the current and target teacher
    /// before the greedy pass moves a section.
    pub greedy_slack_hours: f64,
    /// A binary solver variable counts as chosen above this value.
    pub solution_threshold: f64,
    /// Strategy used by `ScheduleManager::rebalance_default`.
    pub default_strategy: RebalanceStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            greedy_slack_hours: 2.0,
            solution_threshold: 0.5,
            default_strategy: RebalanceStrategy::Optimal,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.greedy_slack_hours >= 0.0 && self.greedy_slack_hours.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "greedy_slack_hours",
                reason: format!("{} must be a finite value >= 0", self.greedy_slack_hours),
            });
        }
        if !(self.solution_threshold > 0.0 && self.solution_threshold < 1.0) {
            return Err(ConfigError::Invalid {
                field: "solution_threshold",
                reason: format!("{} must lie in (0, 1)", self.solution_threshold),
            });
        }
        Ok(())
    }
}

//! Configuration for a single optimization run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::rules::{
    CustomRule, ExposureLimits, Objective, ObjectiveParams, PositionLimits, StackingRules,
    UniquenessRules,
};
use crate::error::ConfigError;

/// Pool generation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Candidate attempts per portfolio lineup.
    #[serde(default = "default_pool_multiplier")]
    pub pool_multiplier: usize,
    /// Hard cap on solve attempts regardless of target size.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
    /// Wall-clock limit for each lineup solve.
    #[serde(default = "default_solve_time_limit_secs")]
    pub solve_time_limit_secs: u64,
    /// Wall-clock budget for the whole generation phase.
    #[serde(default = "default_generation_budget_secs")]
    pub generation_budget_secs: u64,
    /// Attempts between progress log lines.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

const fn default_pool_multiplier() -> usize {
    20
}

const fn default_max_pool_size() -> usize {
    5000
}

const fn default_solve_time_limit_secs() -> u64 {
    60
}

const fn default_generation_budget_secs() -> u64 {
    1200 // 20 minutes
}

const fn default_progress_interval() -> usize {
    100
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            pool_multiplier: default_pool_multiplier(),
            max_pool_size: default_max_pool_size(),
            solve_time_limit_secs: default_solve_time_limit_secs(),
            generation_budget_secs: default_generation_budget_secs(),
            progress_interval: default_progress_interval(),
        }
    }
}

/// k-means settings for portfolio diversification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Independent k-means restarts; the lowest-inertia run wins.
    #[serde(default = "default_n_init")]
    pub n_init: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

const fn default_seed() -> u64 {
    42
}

const fn default_n_init() -> usize {
    10
}

const fn default_max_iterations() -> usize {
    300
}

impl Default for DiversificationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            n_init: default_n_init(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Everything that shapes one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Lineups wanted in the final portfolio.
    #[serde(default = "default_target_portfolio_size")]
    pub target_portfolio_size: usize,

    #[serde(default = "default_salary_cap")]
    pub salary_cap: u32,

    #[serde(default)]
    pub positions: PositionLimits,

    #[serde(default)]
    pub stacking_rules: StackingRules,

    #[serde(default)]
    pub exposure_limits: ExposureLimits,

    #[serde(default)]
    pub uniqueness: UniquenessRules,

    /// Objective name, resolved with [`OptimizerConfig::objective`].
    #[serde(default = "default_objective")]
    pub objective: String,

    #[serde(default)]
    pub objective_params: ObjectiveParams,

    #[serde(default)]
    pub custom_rules: Vec<CustomRule>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub diversification: DiversificationConfig,
}

const fn default_target_portfolio_size() -> usize {
    150
}

const fn default_salary_cap() -> u32 {
    50_000
}

fn default_objective() -> String {
    "leveraged_ceiling".to_string()
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            target_portfolio_size: default_target_portfolio_size(),
            salary_cap: default_salary_cap(),
            positions: PositionLimits::default(),
            stacking_rules: StackingRules::default(),
            exposure_limits: ExposureLimits::default(),
            uniqueness: UniquenessRules::default(),
            objective: default_objective(),
            objective_params: ObjectiveParams::default(),
            custom_rules: Vec::new(),
            generation: GenerationConfig::default(),
            diversification: DiversificationConfig::default(),
        }
    }
}

fn fraction_in_unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

impl OptimizerConfig {
    /// Resolve the configured objective.
    pub fn objective(&self) -> Result<Objective, DomainError> {
        Objective::from_name(&self.objective, &self.objective_params)
    }

    /// Number of solve attempts for the candidate pool.
    #[must_use]
    pub fn pool_attempts(&self) -> usize {
        self.generation
            .max_pool_size
            .min(self.generation.pool_multiplier * self.target_portfolio_size)
    }

    #[must_use]
    pub fn solve_time_limit(&self) -> Duration {
        Duration::from_secs(self.generation.solve_time_limit_secs)
    }

    #[must_use]
    pub fn generation_budget(&self) -> Duration {
        Duration::from_secs(self.generation.generation_budget_secs)
    }

    /// Check value ranges.
    ///
    /// Position ranges that cannot add up to a nine-player roster are not
    /// rejected here; such a run simply finds no feasible lineup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_portfolio_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "target_portfolio_size",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.salary_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "salary_cap",
                reason: "must be greater than 0".to_string(),
            });
        }
        for (position, range) in self.positions.iter() {
            if range.min > range.max {
                return Err(ConfigError::InvalidValue {
                    field: "positions",
                    reason: format!("{position}: min {} exceeds max {}", range.min, range.max),
                });
            }
        }

        let exposure = &self.exposure_limits;
        fraction_in_unit_range("max_exposure", exposure.max_exposure)?;
        fraction_in_unit_range("min_exposure", exposure.min_exposure)?;
        if exposure.min_exposure > exposure.max_exposure {
            return Err(ConfigError::InvalidValue {
                field: "min_exposure",
                reason: "must not exceed max_exposure".to_string(),
            });
        }
        for bounds in exposure.players.values() {
            if let Some(min) = bounds.min {
                fraction_in_unit_range("exposure_limits.players.min", min)?;
            }
            if let Some(max) = bounds.max {
                fraction_in_unit_range("exposure_limits.players.max", max)?;
            }
        }

        if let Some(t) = self.objective_params.risk_tolerance {
            fraction_in_unit_range("risk_tolerance", t)?;
        }
        self.objective().map_err(|e| ConfigError::InvalidValue {
            field: "objective",
            reason: e.to_string(),
        })?;

        if self.generation.pool_multiplier == 0 || self.generation.max_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generation",
                reason: "pool_multiplier and max_pool_size must be greater than 0".to_string(),
            });
        }
        if self.generation.solve_time_limit_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "solve_time_limit_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.diversification.n_init == 0 || self.diversification.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "diversification",
                reason: "n_init and max_iterations must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

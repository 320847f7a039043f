//! Canonical optimizer configurations for tests.

use crate::application::optimizer::OptimizerConfig;

/// Default rules with a small target and tight time limits.
pub fn optimizer_config(target: usize) -> OptimizerConfig {
    let mut config = OptimizerConfig {
        target_portfolio_size: target,
        ..OptimizerConfig::default()
    };
    config.generation.solve_time_limit_secs = 10;
    config.generation.generation_budget_secs = 120;
    config
}

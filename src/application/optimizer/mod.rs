//! Portfolio optimization pipeline.
//!
//! A run validates the player pool, generates a candidate pool of distinct
//! lineups with repeated integer-program solves, clusters the pool down to
//! the target size and summarizes the result:
//!
//! ```text
//! records -> PlayerPool -> PoolGenerator -> PortfolioDiversifier -> PortfolioStats
//! ```

pub mod config;
pub mod constraints;
pub mod diversify;
pub mod generator;
pub mod kmeans;
pub mod ledger;
pub mod lineup;
pub mod objective;
pub mod stats;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

pub use config::{DiversificationConfig, GenerationConfig, OptimizerConfig};
pub use constraints::ConstraintBuilder;
pub use diversify::PortfolioDiversifier;
pub use generator::{CancelToken, GenerationLimits, GenerationReport, PoolGenerator, StopReason};
pub use lineup::{LineupSolver, SolveOutcome};
pub use objective::ObjectiveEvaluator;
pub use stats::PortfolioStats;

use crate::domain::error::DomainError;
use crate::domain::lineup::ROSTER_SIZE;
use crate::domain::player::{Player, PlayerPool, PlayerRecord, PlayerRejection};
use crate::domain::portfolio::Portfolio;
use crate::error::Result;
use crate::port::outbound::solver::Solver;

/// How close the run came to the target portfolio size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Complete,
    Partial,
    NoFeasibleLineups,
}

impl RunOutcome {
    #[must_use]
    pub fn classify(achieved: usize, target: usize) -> Self {
        match achieved {
            0 => Self::NoFeasibleLineups,
            n if n >= target => Self::Complete,
            _ => Self::Partial,
        }
    }
}

/// Run bookkeeping attached to every result.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationMetadata {
    pub optimization_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub objective: &'static str,
    pub execution_time_seconds: f64,
    pub players_considered: usize,
    pub players_rejected: usize,
    pub target_portfolio_size: usize,
    pub pool_size: usize,
    pub achieved_portfolio_size: usize,
    pub outcome: RunOutcome,
    pub generation: GenerationReport,
}

/// Portfolio, summary statistics and run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub portfolio: Portfolio,
    pub stats: PortfolioStats,
    pub metadata: OptimizationMetadata,
}

/// Entry point for portfolio optimization.
pub struct LineupOptimizer {
    solver: Arc<dyn Solver>,
    config: OptimizerConfig,
    cancel: CancelToken,
}

impl LineupOptimizer {
    #[must_use]
    pub fn new(solver: Arc<dyn Solver>, config: OptimizerConfig) -> Self {
        Self {
            solver,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Share a cancellation token with the caller. Tripping it stops pool
    /// generation between attempts and the lineups found so far are used.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Validate raw player records and optimize over the survivors.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or when no record survives
    /// validation. Infeasible solves are not errors: they only shrink the
    /// portfolio.
    pub fn optimize(&self, records: Vec<PlayerRecord>) -> Result<OptimizationResult> {
        let (pool, rejected) = PlayerPool::from_records(records);
        self.run(pool, rejected)
    }

    /// Optimize over loosely-typed JSON rows, as read from a player file.
    /// Rows that are not player records are rejected individually.
    ///
    /// # Errors
    ///
    /// See [`LineupOptimizer::optimize`].
    pub fn optimize_rows(&self, rows: Vec<serde_json::Value>) -> Result<OptimizationResult> {
        let (pool, rejected) = PlayerPool::from_rows(rows);
        self.run(pool, rejected)
    }

    /// Optimize over already-constructed players.
    ///
    /// # Errors
    ///
    /// See [`LineupOptimizer::optimize`].
    pub fn optimize_players(&self, players: Vec<Player>) -> Result<OptimizationResult> {
        let (pool, rejected) = PlayerPool::new(players);
        self.run(pool, rejected)
    }

    fn run(&self, pool: PlayerPool, rejected: Vec<PlayerRejection>) -> Result<OptimizationResult> {
        let started = Instant::now();
        let config = &self.config;
        config.validate()?;
        let objective = config.objective()?;

        for rejection in &rejected {
            warn!(
                player_id = %rejection.player_id,
                error = %rejection.error,
                "Dropping invalid player"
            );
        }
        if pool.is_empty() {
            return Err(DomainError::EmptyPlayerPool.into());
        }

        let positions = &config.positions;
        if positions.min_total() > ROSTER_SIZE as u32 || positions.max_total() < ROSTER_SIZE as u32
        {
            warn!(
                min_total = positions.min_total(),
                max_total = positions.max_total(),
                "Position ranges cannot fill a {ROSTER_SIZE}-player roster, every solve will be infeasible"
            );
        }

        info!(
            players = pool.len(),
            rejected = rejected.len(),
            target = config.target_portfolio_size,
            objective = objective.name(),
            solver = self.solver.name(),
            "Starting portfolio optimization"
        );

        let evaluator = ObjectiveEvaluator::new(objective);
        let generator = PoolGenerator::new(
            LineupSolver::new(self.solver.as_ref(), &pool, config, evaluator),
            ConstraintBuilder::new(&pool, config),
            GenerationLimits {
                max_attempts: config.pool_attempts(),
                budget: config.generation_budget(),
                progress_interval: config.generation.progress_interval,
            },
        )
        .with_cancel_token(self.cancel.clone());
        let (candidates, report) = generator.run();
        let pool_size = candidates.len();

        let selected = PortfolioDiversifier::new(
            config.target_portfolio_size,
            config.diversification.clone(),
        )
        .with_exposure_limits(config.exposure_limits.clone())
        .diversify(candidates);
        let portfolio = Portfolio::new(selected);
        let stats = PortfolioStats::from_lineups(portfolio.lineups());

        let outcome = RunOutcome::classify(portfolio.len(), config.target_portfolio_size);
        let metadata = OptimizationMetadata {
            optimization_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            objective: objective.name(),
            execution_time_seconds: started.elapsed().as_secs_f64(),
            players_considered: pool.len(),
            players_rejected: rejected.len(),
            target_portfolio_size: config.target_portfolio_size,
            pool_size,
            achieved_portfolio_size: portfolio.len(),
            outcome,
            generation: report,
        };

        match outcome {
            RunOutcome::NoFeasibleLineups => warn!(
                attempts = metadata.generation.attempts,
                "No feasible lineups found"
            ),
            _ => info!(
                lineups = metadata.achieved_portfolio_size,
                pool = pool_size,
                seconds = metadata.execution_time_seconds,
                ?outcome,
                "Portfolio optimization complete"
            ),
        }

        Ok(OptimizationResult {
            portfolio,
            stats,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::solver::ScriptedSolver;

    #[test]
    fn outcome_classification() {
        assert_eq!(RunOutcome::classify(0, 10), RunOutcome::NoFeasibleLineups);
        assert_eq!(RunOutcome::classify(4, 10), RunOutcome::Partial);
        assert_eq!(RunOutcome::classify(10, 10), RunOutcome::Complete);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let optimizer = LineupOptimizer::new(
            Arc::new(ScriptedSolver::new(Vec::new())),
            OptimizerConfig::default(),
        );
        let err = optimizer.optimize(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::EmptyPlayerPool)));
    }

    #[test]
    fn unknown_objective_is_an_error() {
        let config = OptimizerConfig {
            objective: "moonshot".into(),
            ..OptimizerConfig::default()
        };
        let optimizer = LineupOptimizer::new(Arc::new(ScriptedSolver::new(Vec::new())), config);
        let err = optimizer
            .optimize_players(crate::testkit::domain::slate())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

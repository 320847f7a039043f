//! Rosterforge - DFS lineup portfolio optimization.
//!
//! Builds portfolios of daily-fantasy NFL lineups. Each lineup is the
//! solution of a small binary integer program (salary cap, roster shape,
//! stacking, exposure and uniqueness rules); a large candidate pool is
//! generated sequentially and then reduced to a diverse portfolio with
//! k-means clustering.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Players, lineups, portfolios and roster rules
//! - [`port`] - The [`Solver`](port::Solver) trait for ILP backends
//! - [`adapter`] - HiGHS solver (via `good_lp`) and the CLI
//! - [`application`] - The optimization pipeline
//! - [`infrastructure`] - TOML configuration and logging setup
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rosterforge::adapter::solver::HiGHSSolver;
//! use rosterforge::application::optimizer::{LineupOptimizer, OptimizerConfig};
//! use rosterforge::domain::PlayerRecord;
//!
//! fn run(players: Vec<PlayerRecord>) -> rosterforge::error::Result<()> {
//!     let config = OptimizerConfig {
//!         target_portfolio_size: 20,
//!         ..OptimizerConfig::default()
//!     };
//!     let optimizer = LineupOptimizer::new(Arc::new(HiGHSSolver::new()), config);
//!     let result = optimizer.optimize(players)?;
//!     println!("{} lineups", result.portfolio.len());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

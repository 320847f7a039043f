//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for players, rosters and a synthetic slate.
//! - [`solver`] - [`ScriptedSolver`](solver::ScriptedSolver), a mock
//!   [`Solver`](crate::port::Solver) that replays canned solutions.
//! - [`config`] - Canonical optimizer configurations for fast test runs.

pub mod config;
pub mod domain;
pub mod solver;

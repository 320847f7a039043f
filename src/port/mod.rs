//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`Solver`] - ILP optimization backend

pub mod outbound;

pub use outbound::solver::{
    Constraint, ConstraintSense, IlpProblem, IlpSolution, SolutionStatus, Solver,
    VariableBounds,
};

//! Solver port for integer linear programming.
//!
//! Defines the contract the lineup optimizer needs from a mixed-integer
//! backend: binary variables, linear (in)equalities, a linear objective, a
//! wall-clock bound, and a status plus assignment on return.
//!
//! # Overview
//!
//! - [`Solver`]: Core ILP solver interface
//! - [`IlpProblem`]: Problem definition
//! - [`IlpSolution`]: Solution representation

use std::time::Duration;

pub use crate::domain::constraint::{Constraint, ConstraintSense, VariableBounds};
use crate::error::Result;

/// Integer linear programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, CBC, etc.) and
/// provide a unified interface for optimization problems.
///
/// # Implementation Notes
///
/// - Infeasible and timed-out solves are reported through
///   [`SolutionStatus`], not as errors
/// - `Err` is reserved for failures to build or run the model at all
/// - Backends must not write to stdout/stderr
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve an integer linear programming problem.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot build or run the model.
    fn solve_ilp(&self, problem: &IlpProblem) -> Result<IlpSolution>;
}

/// Integer linear programming problem definition.
///
/// ```text
/// maximize    c^T * x
/// subject to  constraints
///             bounds on x
///             x[i] integer for i in integer_vars
/// ```
#[derive(Debug, Clone)]
pub struct IlpProblem {
    /// Objective function coefficients.
    pub objective: Vec<f64>,

    /// Linear constraints on the variables.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each variable.
    pub bounds: Vec<VariableBounds>,

    /// Indices of variables constrained to integer values.
    pub integer_vars: Vec<usize>,

    /// Wall-clock limit for the solve.
    pub time_limit: Option<Duration>,
}

impl IlpProblem {
    /// Create a maximization problem over `objective.len()` binary
    /// variables.
    #[must_use]
    pub fn binary_maximize(objective: Vec<f64>, constraints: Vec<Constraint>) -> Self {
        let n = objective.len();
        Self {
            objective,
            constraints,
            bounds: vec![VariableBounds::binary(); n],
            integer_vars: (0..n).collect(),
            time_limit: None,
        }
    }

    /// Set the wall-clock limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Return the number of decision variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }
}

/// Solution to an integer linear programming problem.
#[derive(Debug, Clone)]
pub struct IlpSolution {
    /// Values for each decision variable. Empty unless the status carries
    /// an assignment.
    pub values: Vec<f64>,

    /// Objective function value at `values`.
    pub objective: f64,

    /// Termination status of the solver.
    pub status: SolutionStatus,
}

impl IlpSolution {
    /// Solution carrying no assignment.
    #[must_use]
    pub fn without_values(status: SolutionStatus) -> Self {
        Self {
            values: Vec::new(),
            objective: 0.0,
            status,
        }
    }

    /// Return `true` if the solver found an optimal solution.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solver proved the returned assignment optimal.
    Optimal,

    /// No feasible solution exists.
    Infeasible,

    /// The wall-clock limit elapsed before optimality was proven.
    TimedOut,

    /// Solver encountered an internal error.
    Error,
}

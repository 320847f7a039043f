//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear/mixed-integer programming
//! solver. This implementation wraps it using the good_lp crate.

use std::time::Instant;

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::outbound::solver::{
    Constraint, ConstraintSense, IlpProblem, IlpSolution, SolutionStatus, Solver,
};

/// Tolerance used when a row has no variables and is checked directly.
const EMPTY_ROW_TOLERANCE: f64 = 1e-9;

/// HiGHS-based ILP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver;

impl HiGHSSolver {
    /// Create a new HiGHS solver instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<IlpSolution> {
        let coefficients = problem
            .constraints
            .iter()
            .flat_map(|row| row.terms.iter().map(|(_, c)| *c).chain([row.rhs]));
        if !problem
            .objective
            .iter()
            .copied()
            .chain(coefficients)
            .all(f64::is_finite)
        {
            return Err(Error::Solver("model has a non-finite coefficient".into()));
        }
        Ok(solve_with_good_lp(problem))
    }
}

fn linear_expression(vars: &[Variable], terms: &[(usize, f64)]) -> Expression {
    terms
        .iter()
        .filter_map(|(i, c)| vars.get(*i).map(|v| *c * *v))
        .sum()
}

/// Internal solver implementation using good_lp.
fn solve_with_good_lp(problem: &IlpProblem) -> IlpSolution {
    let n = problem.num_vars();

    if n == 0 {
        return IlpSolution {
            values: vec![],
            objective: 0.0,
            status: SolutionStatus::Optimal,
        };
    }

    // Rows without variables can be decided up front; HiGHS rejects some of
    // them as model errors instead of reporting infeasibility.
    let (empty, rows): (Vec<&Constraint>, Vec<&Constraint>) =
        problem.constraints.iter().partition(|c| c.terms.is_empty());
    if empty
        .iter()
        .any(|c| !c.is_satisfied(&[], EMPTY_ROW_TOLERANCE))
    {
        return IlpSolution::without_values(SolutionStatus::Infeasible);
    }

    let mut vars = variables!();
    let mut var_list = Vec::with_capacity(n);

    for i in 0..n {
        let bounds = problem.bounds.get(i).copied().unwrap_or_default();
        let mut v = variable();
        if let Some(lb) = bounds.lower {
            v = v.min(lb);
        }
        if let Some(ub) = bounds.upper {
            v = v.max(ub);
        }
        if problem.integer_vars.contains(&i) {
            v = v.integer();
        }
        var_list.push(vars.add(v));
    }

    let objective = linear_expression(
        &var_list,
        &problem
            .objective
            .iter()
            .copied()
            .enumerate()
            .collect::<Vec<_>>(),
    );

    let mut model = vars.maximise(&objective).using(highs);
    model.set_verbose(false);
    if let Some(limit) = problem.time_limit {
        model = model.set_time_limit(limit.as_secs_f64());
    }

    for row in rows {
        let lhs = linear_expression(&var_list, &row.terms);
        let rhs = row.rhs;
        model = match row.sense {
            ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
        };
    }

    let started = Instant::now();
    let solved = model.solve();

    // HiGHS hands back its incumbent when the time limit is hit; such an
    // assignment is not proven optimal.
    if let Some(limit) = problem.time_limit {
        if started.elapsed() >= limit {
            return IlpSolution::without_values(SolutionStatus::TimedOut);
        }
    }

    match solved {
        Ok(solution) => {
            let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();
            let objective = values
                .iter()
                .zip(problem.objective.iter())
                .map(|(v, c)| v * c)
                .sum();

            IlpSolution {
                values,
                objective,
                status: SolutionStatus::Optimal,
            }
        }
        Err(ResolutionError::Infeasible) => IlpSolution::without_values(SolutionStatus::Infeasible),
        Err(other) => {
            let message = other.to_string();
            debug!(error = %message, "HiGHS did not return a solution");
            if message.to_ascii_lowercase().contains("time") {
                IlpSolution::without_values(SolutionStatus::TimedOut)
            } else {
                IlpSolution::without_values(SolutionStatus::Error)
            }
        }
    }
}

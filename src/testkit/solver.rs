//! Mock [`Solver`] for exercising optimizer control flow without HiGHS.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::Result;
use crate::port::outbound::solver::{IlpProblem, IlpSolution, SolutionStatus, Solver};

/// Replays queued solutions in order, then reports every further solve as
/// infeasible.
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    script: Mutex<VecDeque<IlpSolution>>,
    calls: AtomicUsize,
    last_rows: AtomicUsize,
}

impl ScriptedSolver {
    pub fn new(script: Vec<IlpSolution>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Number of `solve_ilp` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Constraint count of the most recent problem.
    pub fn last_row_count(&self) -> usize {
        self.last_rows.load(Ordering::SeqCst)
    }
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<IlpSolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_rows
            .store(problem.constraints.len(), Ordering::SeqCst);
        Ok(self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| IlpSolution::without_values(SolutionStatus::Infeasible)))
    }
}

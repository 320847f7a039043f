//! Candidate pool generation.
//!
//! Lineups are solved one after another. Each accepted lineup feeds the
//! exposure and uniqueness rows of the next solve, so the loop is
//! inherently sequential.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::constraints::ConstraintBuilder;
use super::ledger::LineupLedger;
use super::lineup::{LineupSolver, SolveOutcome};
use crate::domain::id::LineupId;
use crate::domain::lineup::Lineup;

/// Cooperative cancellation flag shared with whoever drives the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    AttemptsExhausted,
    BudgetExhausted,
    Cancelled,
}

/// Attempt counters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub attempts: usize,
    pub accepted: usize,
    pub infeasible: usize,
    pub timed_out: usize,
    pub rejected: usize,
    pub failed: usize,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

/// Attempt and time limits for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationLimits {
    pub max_attempts: usize,
    pub budget: Duration,
    pub progress_interval: usize,
}

/// Sequentially solves lineups until the attempt or time budget runs out.
pub struct PoolGenerator<'a> {
    solver: LineupSolver<'a>,
    builder: ConstraintBuilder<'a>,
    limits: GenerationLimits,
    cancel: CancelToken,
}

impl<'a> PoolGenerator<'a> {
    #[must_use]
    pub fn new(
        solver: LineupSolver<'a>,
        builder: ConstraintBuilder<'a>,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            solver,
            builder,
            limits,
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run to completion. Individual failures only shrink the pool.
    pub fn run(self) -> (Vec<Lineup>, GenerationReport) {
        let started = Instant::now();
        let mut ledger = LineupLedger::new(self.solver.pool().len());
        let mut report = GenerationReport {
            attempts: 0,
            accepted: 0,
            infeasible: 0,
            timed_out: 0,
            rejected: 0,
            failed: 0,
            stop_reason: StopReason::AttemptsExhausted,
            elapsed_seconds: 0.0,
        };

        info!(
            max_attempts = self.limits.max_attempts,
            budget_secs = self.limits.budget.as_secs(),
            "Generating lineup pool"
        );

        while report.attempts < self.limits.max_attempts {
            if self.cancel.is_cancelled() {
                report.stop_reason = StopReason::Cancelled;
                break;
            }
            if started.elapsed() >= self.limits.budget {
                report.stop_reason = StopReason::BudgetExhausted;
                break;
            }

            report.attempts += 1;
            let id = LineupId::new(u32::try_from(ledger.len() + 1).unwrap_or(u32::MAX));
            match self.solver.solve(id, self.builder.dynamic_rows(&ledger)) {
                SolveOutcome::Optimal(lineup) => {
                    if ledger.record(lineup, self.solver.pool()) {
                        report.accepted += 1;
                    } else {
                        debug!(attempt = report.attempts, "Duplicate lineup discarded");
                        report.rejected += 1;
                    }
                }
                SolveOutcome::Infeasible => report.infeasible += 1,
                SolveOutcome::TimedOut => report.timed_out += 1,
                SolveOutcome::Rejected(_) => report.rejected += 1,
                SolveOutcome::Failed(_) => report.failed += 1,
            }

            if self.limits.progress_interval > 0
                && report.attempts % self.limits.progress_interval == 0
            {
                info!(
                    attempts = report.attempts,
                    accepted = report.accepted,
                    "Pool generation progress"
                );
            }
        }

        report.elapsed_seconds = started.elapsed().as_secs_f64();
        match report.stop_reason {
            StopReason::AttemptsExhausted => info!(
                attempts = report.attempts,
                accepted = report.accepted,
                infeasible = report.infeasible,
                timed_out = report.timed_out,
                "Lineup pool complete"
            ),
            reason => warn!(
                ?reason,
                attempts = report.attempts,
                accepted = report.accepted,
                "Lineup pool generation stopped early"
            ),
        }

        (ledger.into_lineups(), report)
    }
}

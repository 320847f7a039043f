//! One lineup solve: build the program, hand it to the backend, read back
//! and re-validate the selection.

use std::time::Duration;

use tracing::{debug, warn};

use super::config::OptimizerConfig;
use super::constraints::ConstraintBuilder;
use super::objective::ObjectiveEvaluator;
use crate::domain::constraint::Constraint;
use crate::domain::id::LineupId;
use crate::domain::lineup::{Lineup, LineupValidation};
use crate::domain::player::{Player, PlayerPool};
use crate::domain::rules::PositionLimits;
use crate::port::outbound::solver::{IlpProblem, SolutionStatus, Solver};

/// Variable values above this count as selected.
const SELECTION_THRESHOLD: f64 = 0.5;

/// Result of one solve attempt. Only `Optimal` yields a lineup.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Optimal(Lineup),
    Infeasible,
    TimedOut,
    /// The backend returned an assignment that fails roster validation.
    Rejected(LineupValidation),
    /// The backend failed outright.
    Failed(String),
}

impl SolveOutcome {
    #[must_use]
    pub fn lineup(self) -> Option<Lineup> {
        match self {
            Self::Optimal(lineup) => Some(lineup),
            _ => None,
        }
    }
}

/// Solves single lineups against a fixed pool, objective and static rows.
pub struct LineupSolver<'a> {
    solver: &'a dyn Solver,
    pool: &'a PlayerPool,
    scores: Vec<f64>,
    static_rows: Vec<Constraint>,
    salary_cap: u32,
    positions: PositionLimits,
    time_limit: Duration,
}

impl<'a> LineupSolver<'a> {
    #[must_use]
    pub fn new(
        solver: &'a dyn Solver,
        pool: &'a PlayerPool,
        config: &OptimizerConfig,
        evaluator: ObjectiveEvaluator,
    ) -> Self {
        let static_rows = ConstraintBuilder::new(pool, config).static_rows();
        Self {
            solver,
            pool,
            scores: evaluator.scores(pool),
            static_rows,
            salary_cap: config.salary_cap,
            positions: config.positions.clone(),
            time_limit: config.solve_time_limit(),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PlayerPool {
        self.pool
    }

    /// Solve for the best lineup under the static rows plus `dynamic_rows`.
    #[must_use]
    pub fn solve(&self, id: LineupId, dynamic_rows: Vec<Constraint>) -> SolveOutcome {
        let mut constraints = self.static_rows.clone();
        constraints.extend(dynamic_rows);
        let problem = IlpProblem::binary_maximize(self.scores.clone(), constraints)
            .with_time_limit(self.time_limit);

        let solution = match self.solver.solve_ilp(&problem) {
            Ok(solution) => solution,
            Err(e) => {
                warn!(solver = self.solver.name(), error = %e, "Solver failed");
                return SolveOutcome::Failed(e.to_string());
            }
        };

        match solution.status {
            SolutionStatus::Optimal => {}
            SolutionStatus::Infeasible => return SolveOutcome::Infeasible,
            SolutionStatus::TimedOut => return SolveOutcome::TimedOut,
            SolutionStatus::Error => {
                return SolveOutcome::Failed("solver reported an internal error".into());
            }
        }

        let players: Vec<Player> = solution
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > SELECTION_THRESHOLD)
            .filter_map(|(i, _)| self.pool.get(i).cloned())
            .collect();

        let validation = LineupValidation::check(&players, self.salary_cap, &self.positions);
        if !validation.is_valid() {
            debug!(?validation, selected = players.len(), "Solver selection failed validation");
            return SolveOutcome::Rejected(validation);
        }

        SolveOutcome::Optimal(Lineup::new(
            id,
            players,
            self.salary_cap,
            &self.positions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::solver::HiGHSSolver;
    use crate::domain::player::Position;
    use crate::domain::rules::Objective;
    use crate::port::outbound::solver::IlpSolution;
    use crate::testkit::domain::slate;
    use crate::testkit::solver::ScriptedSolver;

    fn evaluator() -> ObjectiveEvaluator {
        ObjectiveEvaluator::new(Objective::ProjectedPoints)
    }

    #[test]
    fn highs_finds_valid_lineup_on_slate() {
        let (pool, _) = PlayerPool::new(slate());
        let config = OptimizerConfig::default();
        let solver = HiGHSSolver::new();
        let lineup = LineupSolver::new(&solver, &pool, &config, evaluator())
            .solve(LineupId::new(1), Vec::new())
            .lineup()
            .expect("slate admits a lineup");

        assert!(lineup.is_valid());
        assert!(lineup.total_salary() <= config.salary_cap);
        assert!(lineup.max_team_stack() <= config.stacking_rules.team_stack_max);

        let qb = lineup
            .players()
            .iter()
            .find(|p| p.position() == Position::Qb)
            .unwrap();
        assert!(lineup
            .players()
            .iter()
            .any(|p| p.team() == qb.team() && p.position().is_pass_catcher()));
    }

    #[test]
    fn oversubscribed_minimums_are_infeasible() {
        let (pool, _) = PlayerPool::new(slate());
        let mut config = OptimizerConfig::default();
        config.positions.rb.min = 3;
        config.positions.wr.min = 4;
        config.positions.wr.max = 4;
        let solver = HiGHSSolver::new();
        let outcome =
            LineupSolver::new(&solver, &pool, &config, evaluator()).solve(LineupId::new(1), vec![]);
        assert!(matches!(outcome, SolveOutcome::Infeasible));
    }

    #[test]
    fn invalid_assignment_is_rejected() {
        let (pool, _) = PlayerPool::new(slate());
        let config = OptimizerConfig::default();
        // Select only the first three players.
        let mut values = vec![0.0; pool.len()];
        values[..3].fill(1.0);
        let solver = ScriptedSolver::new(vec![IlpSolution {
            values,
            objective: 0.0,
            status: SolutionStatus::Optimal,
        }]);
        let outcome =
            LineupSolver::new(&solver, &pool, &config, evaluator()).solve(LineupId::new(1), vec![]);
        match outcome {
            SolveOutcome::Rejected(validation) => assert!(!validation.roster_size),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn timeout_and_backend_errors_yield_no_lineup() {
        let (pool, _) = PlayerPool::new(slate());
        let config = OptimizerConfig::default();
        let solver = ScriptedSolver::new(vec![
            IlpSolution::without_values(SolutionStatus::TimedOut),
            IlpSolution::without_values(SolutionStatus::Error),
        ]);
        let lineup_solver = LineupSolver::new(&solver, &pool, &config, evaluator());
        assert!(matches!(
            lineup_solver.solve(LineupId::new(1), vec![]),
            SolveOutcome::TimedOut
        ));
        assert!(matches!(
            lineup_solver.solve(LineupId::new(1), vec![]),
            SolveOutcome::Failed(_)
        ));
        assert_eq!(solver.calls(), 2);
    }
}

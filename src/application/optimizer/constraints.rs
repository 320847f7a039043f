//! Linear rows of the per-lineup integer program.
//!
//! Variable `i` is the binary selection of player `i` in the
//! [`PlayerPool`]. Static rows depend only on the pool and the
//! configuration; dynamic rows also depend on the lineups accepted so far.

use tracing::{debug, warn};

use super::config::OptimizerConfig;
use super::ledger::LineupLedger;
use crate::domain::constraint::Constraint;
use crate::domain::lineup::ROSTER_SIZE;
use crate::domain::player::{PlayerPool, Position};
use crate::domain::rules::{allowed_count, CustomRule};

/// Group limits at or above a full roster cannot bind.
const UNBOUNDED_STACK: u32 = ROSTER_SIZE as u32;

/// Builds constraint rows for one run.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintBuilder<'a> {
    pool: &'a PlayerPool,
    config: &'a OptimizerConfig,
}

impl<'a> ConstraintBuilder<'a> {
    #[must_use]
    pub const fn new(pool: &'a PlayerPool, config: &'a OptimizerConfig) -> Self {
        Self { pool, config }
    }

    /// Salary, position, stacking and custom rows.
    #[must_use]
    pub fn static_rows(&self) -> Vec<Constraint> {
        let mut rows = vec![self.salary()];
        rows.extend(self.positions());
        rows.extend(self.stacking());
        rows.extend(self.custom());
        debug!(rows = rows.len(), "Built static constraint rows");
        rows
    }

    /// Exposure and uniqueness rows for the next attempt.
    #[must_use]
    pub fn dynamic_rows(&self, ledger: &LineupLedger) -> Vec<Constraint> {
        let mut rows = self.exposure(ledger);
        rows.extend(self.uniqueness(ledger));
        rows
    }

    /// Σ salary·x ≤ salary_cap.
    #[must_use]
    pub fn salary(&self) -> Constraint {
        Constraint::leq(self.salary_terms(), f64::from(self.config.salary_cap))
    }

    /// Per-position ranges and the exact roster size.
    #[must_use]
    pub fn positions(&self) -> Vec<Constraint> {
        let mut rows = Vec::with_capacity(Position::ALL.len() * 2 + 1);
        for (position, range) in self.config.positions.iter() {
            let terms = Constraint::count(self.pool.indices_at(position));
            if terms.is_empty() && range.min > 0 {
                warn!(
                    position = %position,
                    min = range.min,
                    "No players available for required position"
                );
            }
            rows.push(Constraint::geq(terms.clone(), f64::from(range.min)));
            rows.push(Constraint::leq(terms, f64::from(range.max)));
        }
        rows.push(Constraint::eq(
            Constraint::count(0..self.pool.len()),
            ROSTER_SIZE as f64,
        ));
        rows
    }

    /// QB-stack, game-stack and team-stack rows.
    #[must_use]
    pub fn stacking(&self) -> Vec<Constraint> {
        let rules = &self.config.stacking_rules;
        let mut rows = Vec::new();

        if rules.qb_stack_min > 0 {
            for qb in self.pool.indices_at(Position::Qb) {
                let Some(team) = self.pool.get(qb).map(|p| p.team()) else {
                    continue;
                };
                if team.is_empty() {
                    continue;
                }
                let mut terms: Vec<(usize, f64)> = self
                    .pool
                    .indices_on_team(team)
                    .filter(|&i| {
                        self.pool
                            .get(i)
                            .is_some_and(|p| p.position().is_pass_catcher())
                    })
                    .map(|i| (i, 1.0))
                    .collect();
                if terms.is_empty() {
                    continue;
                }
                // Σ catchers - k·qb ≥ 0
                terms.push((qb, -f64::from(rules.qb_stack_min)));
                rows.push(Constraint::geq(terms, 0.0));
            }
        }

        if rules.game_stack_max < UNBOUNDED_STACK {
            for (teams, players) in self.pool.games().into_values() {
                if teams.len() < 2 {
                    continue;
                }
                rows.push(Constraint::leq(
                    Constraint::count(players),
                    f64::from(rules.game_stack_max),
                ));
            }
        }

        if rules.team_stack_max < UNBOUNDED_STACK {
            for team in self.pool.teams() {
                rows.push(Constraint::leq(
                    Constraint::count(self.pool.indices_on_team(team)),
                    f64::from(rules.team_stack_max),
                ));
            }
        }

        rows
    }

    /// Rows for the configured custom rules. Rules naming players or teams
    /// absent from the pool are skipped.
    #[must_use]
    pub fn custom(&self) -> Vec<Constraint> {
        let mut rows = Vec::with_capacity(self.config.custom_rules.len());
        for rule in &self.config.custom_rules {
            match rule {
                CustomRule::ForcePlayer { player_id } => match self.pool.index_of(player_id) {
                    Some(i) => rows.push(Constraint::fix(i, 1.0)),
                    None => warn!(player_id = %player_id, "Forced player not in pool, rule skipped"),
                },
                CustomRule::ExcludePlayer { player_id } => match self.pool.index_of(player_id) {
                    Some(i) => rows.push(Constraint::fix(i, 0.0)),
                    None => {
                        warn!(player_id = %player_id, "Excluded player not in pool, rule skipped");
                    }
                },
                CustomRule::MinSalary { min_salary } => {
                    rows.push(Constraint::geq(self.salary_terms(), f64::from(*min_salary)));
                }
                CustomRule::MaxTeamExposure { team, max_players } => {
                    let terms = Constraint::count(self.pool.indices_on_team(team));
                    if terms.is_empty() {
                        warn!(team = %team, "Team not in pool, rule skipped");
                        continue;
                    }
                    rows.push(Constraint::leq(terms, f64::from(*max_players)));
                }
            }
        }
        rows
    }

    /// Fix players in or out so the portfolio respects exposure limits once
    /// the next lineup is added. Before the first lineup only players with
    /// a zero maximum are fixed out.
    #[must_use]
    pub fn exposure(&self, ledger: &LineupLedger) -> Vec<Constraint> {
        let limits = &self.config.exposure_limits;
        if ledger.is_empty() {
            return self
                .pool
                .players()
                .iter()
                .enumerate()
                .filter(|(_, player)| limits.bounds_for(player.id()).1 <= 0.0)
                .map(|(i, _)| Constraint::fix(i, 0.0))
                .collect();
        }
        let total = ledger.len() + 1;
        let mut rows = Vec::new();

        for (i, player) in self.pool.players().iter().enumerate() {
            let (min, max) = limits.bounds_for(player.id());
            let usage = ledger.usage(i);
            if usage >= allowed_count(max, total) {
                rows.push(Constraint::fix(i, 0.0));
            } else if usage < allowed_count(min, total) && total > limits.min_exposure_warmup {
                rows.push(Constraint::fix(i, 1.0));
            }
        }
        rows
    }

    /// Cap the overlap with every accepted lineup.
    #[must_use]
    pub fn uniqueness(&self, ledger: &LineupLedger) -> Vec<Constraint> {
        let max_overlap = f64::from(self.config.uniqueness.max_overlap);
        ledger
            .selections()
            .iter()
            .filter(|selection| selection.len() as f64 > max_overlap)
            .map(|selection| Constraint::leq(Constraint::count(selection.iter().copied()), max_overlap))
            .collect()
    }

    fn salary_terms(&self) -> Vec<(usize, f64)> {
        self.pool
            .players()
            .iter()
            .enumerate()
            .map(|(i, p)| (i, f64::from(p.salary())))
            .collect()
    }
}

//! Per-player objective coefficients.
//!
//! Each lineup solve maximizes the sum of its players' scores, so every
//! objective reduces to one number per player.

use crate::domain::player::{Player, PlayerPool};
use crate::domain::rules::{HybridWeights, Objective};

/// Ownership percentage below which player leverage stops growing.
const MIN_OWNERSHIP_PCT: f64 = 0.1;

/// Salaries are floored here so near-free players don't dominate value.
const MIN_VALUE_SALARY: f64 = 1000.0;

/// Ceiling points per fraction of the field rostering the player.
#[must_use]
pub fn player_leverage(player: &Player) -> f64 {
    let ownership = player.projected_ownership().max(MIN_OWNERSHIP_PCT) / 100.0;
    player.ceiling_points() / ownership
}

/// Projected points per $1000 of salary.
#[must_use]
pub fn player_value(player: &Player) -> f64 {
    player.projected_points() / f64::from(player.salary()).max(MIN_VALUE_SALARY) * 1000.0
}

/// Scores players under one [`Objective`].
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveEvaluator {
    objective: Objective,
}

impl ObjectiveEvaluator {
    #[must_use]
    pub const fn new(objective: Objective) -> Self {
        Self { objective }
    }

    #[must_use]
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    /// Objective coefficient for a single player.
    #[must_use]
    pub fn score(&self, player: &Player) -> f64 {
        match self.objective {
            Objective::LeveragedCeiling => player_leverage(player),
            Objective::ProjectedPoints => player.projected_points(),
            Objective::CeilingPoints => player.ceiling_points(),
            Objective::Value => player_value(player),
            Objective::Hybrid { weights } => hybrid(player, weights),
            Objective::RiskAdjusted { risk_tolerance } => {
                let upside = player.ceiling_points() - player.projected_points();
                let downside = player.projected_points() - player.floor_points();
                player.projected_points() + risk_tolerance * upside
                    - (1.0 - risk_tolerance) * downside
            }
            Objective::Tournament => {
                let ownership = player.projected_ownership().max(MIN_OWNERSHIP_PCT) / 100.0;
                player.ceiling_points() * (2.0 - ownership)
            }
            Objective::CashGame => (player.projected_points() + player.floor_points()) / 2.0,
        }
    }

    /// Coefficients for every player in pool order.
    #[must_use]
    pub fn scores(&self, pool: &PlayerPool) -> Vec<f64> {
        pool.players().iter().map(|p| self.score(p)).collect()
    }
}

fn hybrid(player: &Player, weights: HybridWeights) -> f64 {
    weights.leverage * player_leverage(player)
        + weights.projected_points * player.projected_points()
        + weights.value * player_value(player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::Position;
    use crate::testkit::domain::player;

    fn star() -> Player {
        player("star", Position::Wr, "KC", 8000, 20.0)
            .with_ceiling(30.0)
            .unwrap()
            .with_floor(12.0)
            .unwrap()
            .with_ownership(25.0)
            .unwrap()
    }

    fn score(objective: Objective, player: &Player) -> f64 {
        ObjectiveEvaluator::new(objective).score(player)
    }

    #[test]
    fn leveraged_ceiling_divides_by_ownership_fraction() {
        assert!((score(Objective::LeveragedCeiling, &star()) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_ownership_is_floored() {
        let p = star().with_ownership(0.0).unwrap();
        assert!((player_leverage(&p) - 30_000.0).abs() < 1e-6);
    }

    #[test]
    fn value_floors_salary() {
        let cheap = player("min", Position::Dst, "KC", 500, 5.0);
        assert!((player_value(&cheap) - 5.0).abs() < 1e-9);
        assert!((player_value(&star()) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn risk_adjusted_at_neutral_tolerance() {
        // 20 + 0.5 * 10 - 0.5 * 8
        let s = score(
            Objective::RiskAdjusted {
                risk_tolerance: 0.5,
            },
            &star(),
        );
        assert!((s - 21.0).abs() < 1e-9);
    }

    #[test]
    fn hybrid_blends_components() {
        let s = score(
            Objective::Hybrid {
                weights: HybridWeights::default(),
            },
            &star(),
        );
        let expected = 0.5 * 120.0 + 0.3 * 20.0 + 0.2 * 2.5;
        assert!((s - expected).abs() < 1e-9);
    }

    #[test]
    fn cash_game_averages_projection_and_floor() {
        assert!((score(Objective::CashGame, &star()) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn tournament_penalizes_ownership() {
        // 30 * (1 + (1 - 0.25))
        assert!((score(Objective::Tournament, &star()) - 52.5).abs() < 1e-9);
        let chalk = star().with_ownership(90.0).unwrap();
        assert!(score(Objective::Tournament, &chalk) < score(Objective::Tournament, &star()));
    }

    #[test]
    fn default_floor_and_ceiling_follow_projection() {
        let p = player("p", Position::Rb, "BUF", 6000, 16.0);
        assert_eq!(score(Objective::CeilingPoints, &p), 16.0);
        assert_eq!(score(Objective::ProjectedPoints, &p), 16.0);
    }
}

//! Portfolio summary statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::id::PlayerId;
use crate::domain::lineup::Lineup;

/// Aggregate metrics over a finished portfolio. All zero when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub lineup_count: usize,
    pub avg_projected_points: f64,
    pub avg_ceiling_points: f64,
    pub avg_ownership: f64,
    pub avg_leverage_score: f64,
    pub avg_salary: f64,
    pub unique_players: usize,
    pub max_player_exposure: usize,
    pub min_player_exposure: usize,
    /// Lineups containing each player.
    pub player_exposure: BTreeMap<PlayerId, usize>,
}

impl PortfolioStats {
    #[must_use]
    pub fn from_lineups(lineups: &[Lineup]) -> Self {
        if lineups.is_empty() {
            return Self::default();
        }

        let mut player_exposure: BTreeMap<PlayerId, usize> = BTreeMap::new();
        for lineup in lineups {
            for player in lineup.players() {
                *player_exposure.entry(player.id().clone()).or_default() += 1;
            }
        }

        let n = lineups.len() as f64;
        let mean = |f: fn(&Lineup) -> f64| lineups.iter().map(f).sum::<f64>() / n;

        Self {
            lineup_count: lineups.len(),
            avg_projected_points: mean(Lineup::projected_points),
            avg_ceiling_points: mean(Lineup::ceiling_points),
            avg_ownership: mean(Lineup::projected_ownership),
            avg_leverage_score: mean(Lineup::leverage_score),
            avg_salary: mean(|l| f64::from(l.total_salary())),
            unique_players: player_exposure.len(),
            max_player_exposure: player_exposure.values().copied().max().unwrap_or(0),
            min_player_exposure: player_exposure.values().copied().min().unwrap_or(0),
            player_exposure,
        }
    }

    /// Share of lineups containing `player`, in `[0, 1]`.
    #[must_use]
    pub fn exposure_fraction(&self, player: &PlayerId) -> f64 {
        if self.lineup_count == 0 {
            return 0.0;
        }
        self.player_exposure.get(player).copied().unwrap_or(0) as f64 / self.lineup_count as f64
    }

    /// The `n` most-used players, most used first; ties by id.
    #[must_use]
    pub fn top_exposures(&self, n: usize) -> Vec<(&PlayerId, usize)> {
        let mut ranked: Vec<(&PlayerId, usize)> =
            self.player_exposure.iter().map(|(id, c)| (id, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::LineupId;
    use crate::domain::rules::PositionLimits;
    use crate::testkit::domain::standard_roster;

    fn lineup(id: u32, prefix: &str) -> Lineup {
        Lineup::new(
            LineupId::new(id),
            standard_roster(prefix),
            50_000,
            &PositionLimits::default(),
        )
    }

    #[test]
    fn empty_portfolio_has_zero_stats() {
        assert_eq!(PortfolioStats::from_lineups(&[]), PortfolioStats::default());
    }

    #[test]
    fn exposure_histogram_counts_lineups() {
        let mut shared = standard_roster("b");
        shared[0] = standard_roster("a")[0].clone();
        let lineups = vec![
            lineup(1, "a"),
            Lineup::new(LineupId::new(2), shared, 50_000, &PositionLimits::default()),
        ];
        let stats = PortfolioStats::from_lineups(&lineups);

        assert_eq!(stats.lineup_count, 2);
        assert_eq!(stats.unique_players, 17);
        assert_eq!(stats.max_player_exposure, 2);
        assert_eq!(stats.min_player_exposure, 1);

        let top = stats.top_exposures(1);
        assert_eq!(top[0].1, 2);
        assert_eq!(stats.exposure_fraction(top[0].0), 1.0);
    }

    #[test]
    fn averages_match_single_lineup() {
        let one = lineup(1, "a");
        let stats = PortfolioStats::from_lineups(std::slice::from_ref(&one));
        assert_eq!(stats.avg_projected_points, one.projected_points());
        assert_eq!(stats.avg_leverage_score, one.leverage_score());
        assert_eq!(stats.avg_salary, f64::from(one.total_salary()));
    }
}

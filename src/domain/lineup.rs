//! Lineups: nine rostered players plus the metrics derived from them.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::id::{LineupId, PlayerId};
use super::player::{Player, Position};
use super::rules::PositionLimits;

/// Players in every lineup.
pub const ROSTER_SIZE: usize = 9;

/// Lower bound on total ownership when computing a lineup's leverage.
pub const OWNERSHIP_FLOOR: f64 = 1.0;

/// Site roster order. FLEX takes the one RB/WR/TE above the minimums.
const SLOT_TEMPLATE: [(&str, Option<Position>); ROSTER_SIZE] = [
    ("QB", Some(Position::Qb)),
    ("RB", Some(Position::Rb)),
    ("RB", Some(Position::Rb)),
    ("WR", Some(Position::Wr)),
    ("WR", Some(Position::Wr)),
    ("WR", Some(Position::Wr)),
    ("TE", Some(Position::Te)),
    ("FLEX", None),
    ("DST", Some(Position::Dst)),
];

/// Canonical identity of a lineup: its sorted player ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineupKey(Vec<PlayerId>);

impl LineupKey {
    /// Build a key from any ordering of player ids.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        let mut ids: Vec<PlayerId> = ids.into_iter().cloned().collect();
        ids.sort();
        Self(ids)
    }
}

/// Outcome of checking a set of players against the roster rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineupValidation {
    pub roster_size: bool,
    pub distinct_players: bool,
    pub salary: bool,
    pub positions: bool,
}

impl LineupValidation {
    /// Check size, distinctness, salary cap and position ranges.
    #[must_use]
    pub fn check(players: &[Player], salary_cap: u32, positions: &PositionLimits) -> Self {
        let distinct: BTreeSet<&PlayerId> = players.iter().map(Player::id).collect();
        let salary: u64 = players.iter().map(|p| u64::from(p.salary())).sum();
        let counts = position_counts(players);

        Self {
            roster_size: players.len() == ROSTER_SIZE,
            distinct_players: distinct.len() == players.len(),
            salary: salary <= u64::from(salary_cap),
            positions: positions
                .iter()
                .all(|(pos, range)| range.contains(counts[pos.index()])),
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.roster_size && self.distinct_players && self.salary && self.positions
    }
}

/// One filled roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSlot {
    pub slot: &'static str,
    pub player_id: PlayerId,
}

/// A nine-player roster and its aggregate projections.
#[derive(Debug, Clone, Serialize)]
pub struct Lineup {
    id: LineupId,
    players: Vec<Player>,
    total_salary: u32,
    salary_remaining: i64,
    projected_points: f64,
    ceiling_points: f64,
    floor_points: f64,
    projected_ownership: f64,
    leverage_score: f64,
    is_valid: bool,
    cluster_id: Option<usize>,
    cluster_distance: Option<f64>,
}

impl Lineup {
    /// Aggregate `players` into a lineup and validate it against the cap and
    /// position ranges.
    #[must_use]
    pub fn new(
        id: LineupId,
        players: Vec<Player>,
        salary_cap: u32,
        positions: &PositionLimits,
    ) -> Self {
        let validation = LineupValidation::check(&players, salary_cap, positions);
        let total_salary: u32 = players.iter().map(Player::salary).sum();
        let projected_points = players.iter().map(Player::projected_points).sum();
        let ceiling_points: f64 = players.iter().map(Player::ceiling_points).sum();
        let floor_points = players.iter().map(Player::floor_points).sum();
        let projected_ownership: f64 = players.iter().map(Player::projected_ownership).sum();

        Self {
            id,
            total_salary,
            salary_remaining: i64::from(salary_cap) - i64::from(total_salary),
            projected_points,
            ceiling_points,
            floor_points,
            projected_ownership,
            leverage_score: leverage(ceiling_points, projected_ownership),
            is_valid: validation.is_valid(),
            cluster_id: None,
            cluster_distance: None,
            players,
        }
    }

    /// Tag the lineup with the diversification cluster it represents.
    #[must_use]
    pub fn with_cluster(mut self, cluster_id: usize, distance: f64) -> Self {
        self.cluster_id = Some(cluster_id);
        self.cluster_distance = Some(distance);
        self
    }

    #[must_use]
    pub fn id(&self) -> LineupId {
        self.id
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn total_salary(&self) -> u32 {
        self.total_salary
    }

    #[must_use]
    pub fn salary_remaining(&self) -> i64 {
        self.salary_remaining
    }

    #[must_use]
    pub fn projected_points(&self) -> f64 {
        self.projected_points
    }

    #[must_use]
    pub fn ceiling_points(&self) -> f64 {
        self.ceiling_points
    }

    #[must_use]
    pub fn floor_points(&self) -> f64 {
        self.floor_points
    }

    #[must_use]
    pub fn projected_ownership(&self) -> f64 {
        self.projected_ownership
    }

    #[must_use]
    pub fn leverage_score(&self) -> f64 {
        self.leverage_score
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn cluster_id(&self) -> Option<usize> {
        self.cluster_id
    }

    #[must_use]
    pub fn cluster_distance(&self) -> Option<f64> {
        self.cluster_distance
    }

    #[must_use]
    pub fn key(&self) -> LineupKey {
        LineupKey::new(self.players.iter().map(Player::id))
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| p.id() == id)
    }

    /// Number of players shared with `other`.
    #[must_use]
    pub fn overlap(&self, other: &Lineup) -> usize {
        self.players
            .iter()
            .filter(|p| other.contains(p.id()))
            .count()
    }

    /// Player counts indexed by [`Position::index`].
    #[must_use]
    pub fn position_counts(&self) -> [u32; 5] {
        position_counts(&self.players)
    }

    /// Size of the largest group of players from one team.
    #[must_use]
    pub fn max_team_stack(&self) -> u32 {
        let mut teams: HashMap<&str, u32> = HashMap::new();
        for player in &self.players {
            *teams.entry(player.team()).or_default() += 1;
        }
        teams.into_values().max().unwrap_or(0)
    }

    /// Population standard deviation of the player salaries.
    #[must_use]
    pub fn salary_std_dev(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        let n = self.players.len() as f64;
        let mean = f64::from(self.total_salary) / n;
        let variance = self
            .players
            .iter()
            .map(|p| (f64::from(p.salary()) - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }

    /// Assign players to site slots (QB, RB, RB, WR, WR, WR, TE, FLEX, DST).
    ///
    /// Within a position the most expensive players take the named slots.
    /// Players that fit no slot in the template are appended as FLEX.
    #[must_use]
    pub fn slots(&self) -> Vec<RosterSlot> {
        let mut remaining: Vec<&Player> = self.players.iter().collect();
        remaining.sort_by(|a, b| {
            a.position()
                .cmp(&b.position())
                .then(b.salary().cmp(&a.salary()))
        });

        let mut filled: Vec<Option<&Player>> = vec![None; SLOT_TEMPLATE.len()];
        for (i, (_, position)) in SLOT_TEMPLATE.iter().enumerate() {
            let Some(position) = position else { continue };
            if let Some(at) = remaining.iter().position(|p| p.position() == *position) {
                filled[i] = Some(remaining.remove(at));
            }
        }
        if let Some(flex) = SLOT_TEMPLATE.iter().position(|(_, p)| p.is_none()) {
            if let Some(at) = remaining.iter().position(|p| p.position().is_flex_eligible()) {
                filled[flex] = Some(remaining.remove(at));
            }
        }

        SLOT_TEMPLATE
            .iter()
            .zip(filled)
            .filter_map(|((slot, _), player)| {
                player.map(|p| RosterSlot {
                    slot: *slot,
                    player_id: p.id().clone(),
                })
            })
            .chain(remaining.into_iter().map(|p| RosterSlot {
                slot: "FLEX",
                player_id: p.id().clone(),
            }))
            .collect()
    }
}

/// Ceiling points per unit of ownership, with ownership floored at
/// [`OWNERSHIP_FLOOR`].
#[must_use]
pub fn leverage(ceiling_points: f64, projected_ownership: f64) -> f64 {
    ceiling_points / projected_ownership.max(OWNERSHIP_FLOOR)
}

fn position_counts(players: &[Player]) -> [u32; 5] {
    let mut counts = [0u32; 5];
    for player in players {
        counts[player.position().index()] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{player, standard_roster};

    #[test]
    fn totals_and_leverage_are_derived() {
        let lineup = Lineup::new(
            LineupId::new(1),
            standard_roster("a"),
            50_000,
            &PositionLimits::default(),
        );

        assert_eq!(lineup.players().len(), ROSTER_SIZE);
        assert!(lineup.is_valid());
        assert_eq!(
            lineup.salary_remaining(),
            50_000 - i64::from(lineup.total_salary())
        );
        let expected = lineup.ceiling_points() / lineup.projected_ownership();
        assert!((lineup.leverage_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn lower_ownership_never_lowers_leverage() {
        assert!(leverage(150.0, 80.0) >= leverage(150.0, 120.0));
        assert_eq!(leverage(10.0, 0.2), 10.0);
    }

    #[test]
    fn over_cap_lineup_is_invalid() {
        let lineup = Lineup::new(
            LineupId::new(1),
            standard_roster("a"),
            10_000,
            &PositionLimits::default(),
        );
        assert!(!lineup.is_valid());
        assert!(lineup.salary_remaining() < 0);
    }

    #[test]
    fn duplicate_player_fails_validation() {
        let mut players = standard_roster("a");
        players[8] = players[0].clone();
        let check = LineupValidation::check(&players, 50_000, &PositionLimits::default());
        assert!(!check.distinct_players);
        assert!(!check.is_valid());
    }

    #[test]
    fn key_ignores_order() {
        let players = standard_roster("a");
        let mut reversed = players.clone();
        reversed.reverse();
        assert_eq!(
            LineupKey::new(players.iter().map(Player::id)),
            LineupKey::new(reversed.iter().map(Player::id))
        );
    }

    #[test]
    fn slots_put_extra_skill_player_in_flex() {
        let lineup = Lineup::new(
            LineupId::new(1),
            standard_roster("a"),
            50_000,
            &PositionLimits::default(),
        );
        let slots = lineup.slots();
        let labels: Vec<&str> = slots.iter().map(|s| s.slot).collect();
        assert_eq!(
            labels,
            ["QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "DST"]
        );
    }

    #[test]
    fn salary_std_dev_of_uniform_salaries_is_zero() {
        let players: Vec<Player> = (0..9)
            .map(|i| player(&format!("p{i}"), Position::Wr, "KC", 5000, 10.0))
            .collect();
        let lineup = Lineup::new(LineupId::new(1), players, 50_000, &PositionLimits::default());
        assert_eq!(lineup.salary_std_dev(), 0.0);
        assert_eq!(lineup.max_team_stack(), 9);
    }
}

//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`Player`]s, a valid nine-man
//! roster and a small three-game slate so tests focus on assertions
//! rather than construction boilerplate.

use crate::domain::player::{Player, PlayerRecord, Position};

/// Game id used by [`player`] and [`standard_roster`].
pub const DEFAULT_GAME: &str = "BUF@KC";

/// Teams of the synthetic slate, paired by game.
pub const SLATE_GAMES: [(&str, &str); 3] = [("BUF", "KC"), ("DAL", "PHI"), ("SEA", "SF")];

/// Create a player with default ceiling, floor and ownership.
///
/// # Panics
///
/// Panics on a zero salary or non-positive projection.
pub fn player(id: &str, position: Position, team: &str, salary: u32, projected: f64) -> Player {
    Player::try_new(
        id,
        id,
        position,
        team,
        DEFAULT_GAME,
        i64::from(salary),
        projected,
    )
    .expect("valid test player")
}

/// A valid roster (QB, 3 RB, 3 WR, TE, DST) of nine players whose ids start
/// with `prefix`. Total salary is 48,500.
pub fn standard_roster(prefix: &str) -> Vec<Player> {
    [
        ("qb", Position::Qb, "KC", 7000, 22.0),
        ("rb1", Position::Rb, "KC", 7000, 18.0),
        ("rb2", Position::Rb, "BUF", 6000, 15.0),
        ("wr1", Position::Wr, "KC", 6500, 17.0),
        ("wr2", Position::Wr, "BUF", 5500, 14.0),
        ("wr3", Position::Wr, "BUF", 5000, 12.0),
        ("te", Position::Te, "KC", 4500, 10.0),
        ("flex", Position::Rb, "BUF", 4000, 9.0),
        ("dst", Position::Dst, "BUF", 3000, 7.0),
    ]
    .into_iter()
    .map(|(slot, position, team, salary, projected)| {
        player(&format!("{prefix}-{slot}"), position, team, salary, projected)
    })
    .collect()
}

/// `(slot, position, base salary, salary step per team)` for every team.
const TEAM_TEMPLATE: [(&str, Position, u32, u32); 8] = [
    ("qb", Position::Qb, 7800, 300),
    ("rb1", Position::Rb, 8000, 300),
    ("rb2", Position::Rb, 5600, 200),
    ("wr1", Position::Wr, 7800, 300),
    ("wr2", Position::Wr, 6000, 200),
    ("wr3", Position::Wr, 4200, 100),
    ("te", Position::Te, 5500, 300),
    ("dst", Position::Dst, 3200, 100),
];

/// A 50-player, six-team, three-game slate with varied salaries,
/// projections, ceilings and ownership.
pub fn slate() -> Vec<Player> {
    slate_records()
        .into_iter()
        .map(|r| Player::try_from_record(r).expect("valid slate record"))
        .collect()
}

/// [`slate`] as upstream records.
pub fn slate_records() -> Vec<PlayerRecord> {
    let mut records = Vec::with_capacity(50);
    let teams = SLATE_GAMES
        .iter()
        .flat_map(|(away, home)| [(*away, *away, *home), (*home, *away, *home)]);

    for (t, (team, away, home)) in teams.enumerate() {
        let game_id = format!("{away}@{home}");
        let t = t as u32;
        for (slot, position, base, step) in TEAM_TEMPLATE {
            records.push(record(
                &format!("{team}-{slot}"),
                position,
                team,
                &game_id,
                base - step * t,
                t,
            ));
        }
        match team {
            "BUF" => records.push(record("BUF-rb3", Position::Rb, team, &game_id, 4500, t)),
            "KC" => records.push(record("KC-wr4", Position::Wr, team, &game_id, 3800, t)),
            _ => {}
        }
    }
    records
}

fn record(
    id: &str,
    position: Position,
    team: &str,
    game_id: &str,
    salary: u32,
    tier: u32,
) -> PlayerRecord {
    let projected = f64::from(salary) / 1000.0 * 2.7 + f64::from(tier % 3) * 0.4;
    let ownership = ((f64::from(salary) - 2500.0) / 200.0).clamp(1.0, 40.0);
    PlayerRecord {
        id: id.to_string(),
        name: id.to_string(),
        position: position.code().to_string(),
        team: team.to_string(),
        game_id: game_id.to_string(),
        salary: Some(f64::from(salary)),
        projected_points: Some(projected),
        ceiling_points: Some(projected * (1.4 + f64::from(tier) * 0.05)),
        floor_points: Some(projected * 0.55),
        projected_ownership: Some(ownership),
    }
}

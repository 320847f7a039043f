//! Portfolio invariant checks shared by integration tests.

use std::collections::{HashMap, HashSet};

use rosterforge::application::optimizer::OptimizerConfig;
use rosterforge::domain::{Lineup, Position, ROSTER_SIZE};

/// Assert every roster-level rule on one lineup.
pub fn assert_lineup_obeys_rules(lineup: &Lineup, config: &OptimizerConfig) {
    let players = lineup.players();
    assert_eq!(players.len(), ROSTER_SIZE, "{}: roster size", lineup.id());
    assert!(lineup.is_valid(), "{}: marked invalid", lineup.id());

    let ids: HashSet<_> = players.iter().map(|p| p.id()).collect();
    assert_eq!(ids.len(), ROSTER_SIZE, "{}: repeated player", lineup.id());

    assert!(
        lineup.total_salary() <= config.salary_cap,
        "{}: salary {} over cap",
        lineup.id(),
        lineup.total_salary()
    );

    let counts = lineup.position_counts();
    for (position, range) in config.positions.iter() {
        assert!(
            range.contains(counts[position.index()]),
            "{}: {position} count {} outside {range:?}",
            lineup.id(),
            counts[position.index()]
        );
    }

    let rules = &config.stacking_rules;
    assert!(
        lineup.max_team_stack() <= rules.team_stack_max,
        "{}: team stack {}",
        lineup.id(),
        lineup.max_team_stack()
    );

    let mut games: HashMap<&str, u32> = HashMap::new();
    for p in players {
        *games.entry(p.game_id()).or_default() += 1;
    }
    assert!(
        games
            .values()
            .all(|n| *n <= rules.game_stack_max),
        "{}: game stack {games:?}",
        lineup.id()
    );

    if rules.qb_stack_min > 0 {
        for qb in players.iter().filter(|p| p.position() == Position::Qb) {
            let catchers = players
                .iter()
                .filter(|p| p.team() == qb.team() && p.position().is_pass_catcher())
                .count();
            assert!(
                catchers as u32 >= rules.qb_stack_min,
                "{}: QB {} unstacked",
                lineup.id(),
                qb.id()
            );
        }
    }
}

/// Assert pairwise distinctness under the overlap bound.
pub fn assert_lineups_distinct(lineups: &[Lineup], max_overlap: usize) {
    for (i, a) in lineups.iter().enumerate() {
        for b in &lineups[i + 1..] {
            assert!(
                a.overlap(b) <= max_overlap,
                "{} and {} share {} players",
                a.id(),
                b.id(),
                a.overlap(b)
            );
        }
    }
}

/// Lineups containing each player.
pub fn usage(lineups: &[Lineup]) -> HashMap<String, usize> {
    let mut usage = HashMap::new();
    for lineup in lineups {
        for p in lineup.players() {
            *usage.entry(p.id().to_string()).or_default() += 1;
        }
    }
    usage
}

//! End-to-end optimizer runs against the HiGHS backend.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use rosterforge::adapter::solver::HiGHSSolver;
use rosterforge::application::optimizer::{
    CancelToken, LineupOptimizer, OptimizerConfig, RunOutcome, StopReason,
};
use rosterforge::domain::error::DomainError;
use rosterforge::domain::{CustomRule, PlayerId, PlayerRecord};
use rosterforge::error::Error;
use rosterforge::testkit::domain::{slate, slate_records};
use serde_json::json;

use support::assertions::{assert_lineup_obeys_rules, assert_lineups_distinct, usage};
use support::fixtures::{quick_config, slate_json};

fn optimizer(config: OptimizerConfig) -> LineupOptimizer {
    LineupOptimizer::new(Arc::new(HiGHSSolver::new()), config)
}

#[test]
fn slate_produces_valid_diverse_portfolio() {
    let config = quick_config(10, 5);
    let result = optimizer(config.clone()).optimize_players(slate()).unwrap();

    let lineups = result.portfolio.lineups();
    assert!(!lineups.is_empty());
    assert!(lineups.len() <= 10);
    for lineup in lineups {
        assert_lineup_obeys_rules(lineup, &config);
        assert!(lineup.cluster_id().is_some());
    }
    assert_lineups_distinct(lineups, 8);

    let meta = &result.metadata;
    assert_eq!(meta.players_considered, 50);
    assert_eq!(meta.players_rejected, 0);
    assert_eq!(meta.target_portfolio_size, 10);
    assert_eq!(meta.achieved_portfolio_size, lineups.len());
    assert_eq!(meta.generation.attempts, 50);
    assert_eq!(meta.generation.accepted, meta.pool_size);
    assert_eq!(meta.generation.stop_reason, StopReason::AttemptsExhausted);
    assert_eq!(meta.objective, "leveraged_ceiling");
    assert_ne!(meta.outcome, RunOutcome::NoFeasibleLineups);

    assert_eq!(result.stats.lineup_count, lineups.len());
    assert!(result.stats.avg_leverage_score > 0.0);
}

#[test]
fn default_attempts_fill_the_target_exactly() {
    let config = quick_config(10, 20);
    let result = optimizer(config.clone()).optimize_players(slate()).unwrap();

    let lineups = result.portfolio.lineups();
    assert_eq!(lineups.len(), 10);
    assert_eq!(result.metadata.outcome, RunOutcome::Complete);
    assert!(result.metadata.pool_size > 10);
    for lineup in lineups {
        assert_lineup_obeys_rules(lineup, &config);
    }
    assert_lineups_distinct(lineups, 8);
    let keys: HashSet<_> = lineups.iter().map(|l| l.key()).collect();
    assert_eq!(keys.len(), 10);
}

#[test]
fn clustered_portfolio_respects_max_exposure() {
    let mut config = quick_config(10, 20);
    config.exposure_limits.max_exposure = 0.5;

    let result = optimizer(config).optimize_players(slate()).unwrap();
    let lineups = result.portfolio.lineups();
    let n = lineups.len();
    assert!(result.metadata.pool_size > n, "pool was not clustered");
    assert!(n >= 2);

    // floor(0.5 * target)
    let cap = 5;
    for (player, count) in usage(lineups) {
        assert!(count <= cap, "{player} in {count} of {n} lineups");
    }
}

#[test]
fn json_records_round_into_the_optimizer() {
    let records: Vec<PlayerRecord> = serde_json::from_value(slate_json()).unwrap();
    assert_eq!(records.len(), 50);

    let result = optimizer(quick_config(2, 2)).optimize(records).unwrap();
    assert!(!result.portfolio.is_empty());
}

#[test]
fn null_projection_row_is_dropped_from_json_input() {
    let mut rows = slate_json().as_array().cloned().unwrap();
    rows.push(json!({
        "player_id": "NYJ-qb",
        "name": "Backup",
        "position": "QB",
        "team": "NYJ",
        "game_id": "NYJ@MIA",
        "salary": 5000,
        "projected_points": null,
    }));
    rows.push(json!({
        "player_id": "NYJ-rb",
        "name": "Rotational",
        "position": "RB",
        "salary": 4500.0,
        "projected_points": "n/a",
    }));

    let result = optimizer(quick_config(2, 2)).optimize_rows(rows).unwrap();

    assert!(!result.portfolio.is_empty());
    assert_eq!(result.metadata.players_considered, 50);
    assert_eq!(result.metadata.players_rejected, 2);
}

#[test]
fn oversubscribed_position_minimums_yield_empty_portfolio() {
    let mut config = quick_config(3, 2);
    config.positions.rb.min = 3;
    config.positions.wr.min = 4;
    config.positions.wr.max = 4;

    let result = optimizer(config).optimize_players(slate()).unwrap();

    assert!(result.portfolio.is_empty());
    assert_eq!(result.metadata.outcome, RunOutcome::NoFeasibleLineups);
    assert_eq!(
        result.metadata.generation.infeasible,
        result.metadata.generation.attempts
    );
    assert_eq!(result.stats.lineup_count, 0);
    assert_eq!(result.stats.avg_projected_points, 0.0);
}

#[test]
fn invalid_records_are_dropped_not_fatal() {
    let mut records = slate_records();
    records[0].salary = Some(0.0);
    records[1].projected_points = Some(-3.0);
    records[2].position = "K".into();
    let duplicate = records[10].clone();
    records.push(duplicate);

    let result = optimizer(quick_config(2, 2)).optimize(records).unwrap();

    assert_eq!(result.metadata.players_considered, 47);
    assert_eq!(result.metadata.players_rejected, 4);
}

#[test]
fn all_records_invalid_is_an_error() {
    let mut records = slate_records();
    for record in &mut records {
        record.salary = Some(-1.0);
    }
    let err = optimizer(quick_config(2, 2)).optimize(records).unwrap_err();
    assert!(matches!(err, Error::Domain(DomainError::EmptyPlayerPool)));
}

#[test]
fn forced_and_excluded_players_are_respected() {
    let players = slate();
    let forced = PlayerId::from("DAL-wr2");
    let excluded = PlayerId::from("KC-qb");
    assert!(players.iter().any(|p| p.id() == &forced));

    let mut config = quick_config(4, 2);
    config.exposure_limits.max_exposure = 1.0;
    config.custom_rules = vec![
        CustomRule::ForcePlayer {
            player_id: forced.clone(),
        },
        CustomRule::ExcludePlayer {
            player_id: excluded.clone(),
        },
    ];

    let result = optimizer(config).optimize_players(players).unwrap();
    assert!(!result.portfolio.is_empty());
    for lineup in result.portfolio.lineups() {
        assert!(lineup.contains(&forced));
        assert!(!lineup.contains(&excluded));
    }
}

#[test]
fn unclustered_portfolio_respects_max_exposure() {
    // Attempts equal the target, so the whole pool becomes the portfolio.
    let mut config = quick_config(8, 1);
    config.exposure_limits.max_exposure = 0.5;

    let result = optimizer(config).optimize_players(slate()).unwrap();
    let lineups = result.portfolio.lineups();
    let n = lineups.len();
    assert!(n >= 2);

    let cap = (0.5 * n as f64).floor() as usize;
    for (player, count) in usage(lineups) {
        assert!(count <= cap, "{player} in {count} of {n} lineups");
    }
    for (i, lineup) in lineups.iter().enumerate() {
        assert_eq!(lineup.cluster_id(), Some(i));
        assert_eq!(lineup.cluster_distance(), Some(0.0));
    }
}

#[test]
fn tighter_overlap_bound_is_honored() {
    let mut config = quick_config(5, 1);
    config.uniqueness.max_overlap = 6;
    config.exposure_limits.max_exposure = 1.0;

    let result = optimizer(config).optimize_players(slate()).unwrap();
    let lineups = result.portfolio.lineups();
    assert!(lineups.len() >= 2);
    assert_lineups_distinct(lineups, 6);
}

#[test]
fn every_objective_builds_lineups() {
    for objective in [
        "projected_points",
        "ceiling_points",
        "value",
        "hybrid",
        "risk_adjusted",
        "tournament",
        "cash_game",
    ] {
        let mut config = quick_config(2, 1);
        config.objective = objective.to_string();
        let result = optimizer(config.clone()).optimize_players(slate()).unwrap();
        assert_eq!(result.metadata.objective, objective);
        assert!(!result.portfolio.is_empty(), "{objective} found nothing");
        for lineup in result.portfolio.lineups() {
            assert_lineup_obeys_rules(lineup, &config);
        }
    }
}

#[test]
fn cancelled_run_returns_partial_result() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = optimizer(quick_config(5, 2))
        .with_cancel_token(cancel)
        .optimize_players(slate())
        .unwrap();

    assert!(result.portfolio.is_empty());
    assert_eq!(result.metadata.generation.stop_reason, StopReason::Cancelled);
}

#[test]
fn portfolio_lineups_are_unique_sets() {
    let result = optimizer(quick_config(6, 3))
        .optimize_players(slate())
        .unwrap();
    let keys: HashSet<_> = result.portfolio.iter().map(|l| l.key()).collect();
    assert_eq!(keys.len(), result.portfolio.len());
}

//! Player files and configurations for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use rosterforge::application::optimizer::OptimizerConfig;
use rosterforge::domain::Player;
use rosterforge::testkit::config::optimizer_config;
use rosterforge::testkit::domain::slate;
use serde_json::{json, Value};

/// JSON record for a player, as the upstream producers emit it.
pub fn player_json(player: &Player) -> Value {
    json!({
        "player_id": player.id().as_str(),
        "name": player.name(),
        "position": player.position().code(),
        "team": player.team(),
        "game_id": player.game_id(),
        "salary": player.salary(),
        "projected_points": player.projected_points(),
        "ceiling_points": player.ceiling_points(),
        "floor_points": player.floor_points(),
        "projected_ownership": player.projected_ownership(),
    })
}

/// The synthetic slate as a JSON array.
pub fn slate_json() -> Value {
    Value::Array(slate().iter().map(player_json).collect())
}

/// Write the slate to `dir/players.json`.
pub fn write_slate(dir: &Path) -> PathBuf {
    let path = dir.join("players.json");
    fs::write(&path, slate_json().to_string()).expect("write players");
    path
}

/// Fast configuration: `target` lineups from `multiplier * target` attempts.
pub fn quick_config(target: usize, multiplier: usize) -> OptimizerConfig {
    let mut config = optimizer_config(target);
    config.generation.pool_multiplier = multiplier;
    config
}

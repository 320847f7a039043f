//! Handler for the `optimize` command.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tabled::Tabled;
use tokio::signal;
use tracing::warn;

use crate::adapter::inbound::cli::command::OptimizeArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::solver::HiGHSSolver;
use crate::application::optimizer::{CancelToken, LineupOptimizer, OptimizationResult, RunOutcome};
use crate::domain::lineup::Lineup;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

/// Player exposures listed in the summary.
const TOP_EXPOSURES: usize = 20;

/// Player files are either a bare array or `{ "players": [...] }`. Rows
/// stay untyped here so one bad row does not reject the file.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlayerFile {
    List(Vec<Value>),
    Wrapped { players: Vec<Value> },
}

/// Read player rows from a JSON file.
pub fn read_players(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let file: PlayerFile = serde_json::from_str(&content)?;
    Ok(match file {
        PlayerFile::List(players) | PlayerFile::Wrapped { players } => players,
    })
}

/// Load configuration and apply command-line overrides.
pub fn resolve_config(args: &OptimizeArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(target) = args.target {
        config.optimizer.target_portfolio_size = target;
    }
    if let Some(objective) = &args.objective {
        config.optimizer.objective = objective.clone();
    }
    config.validate()?;

    config
        .logging
        .apply_verbosity(output::is_quiet(), output::verbosity());
    Ok(config)
}

/// Execute `optimize`.
pub async fn execute(args: OptimizeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    config.init_logging();
    let records = read_players(&args.players)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Players", records.len());
    output::field("Target", config.optimizer.target_portfolio_size);
    output::field("Objective", &config.optimizer.objective);

    let cancel = CancelToken::new();
    let optimizer = LineupOptimizer::new(Arc::new(HiGHSSolver::new()), config.optimizer)
        .with_cancel_token(cancel.clone());
    let mut task = tokio::task::spawn_blocking(move || optimizer.optimize_rows(records));

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = signal::ctrl_c() => {
            warn!("Interrupt received, finishing with lineups found so far");
            cancel.cancel();
            task.await
        }
    };
    let result = joined.map_err(|e| Error::Task(e.to_string()))??;

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
    }

    if output::is_json() {
        output::document(&json!({
            "command": "optimize",
            "result": serde_json::to_value(&result)?,
        }));
        return Ok(());
    }

    print_summary(&result, args.show);
    if let Some(path) = &args.output {
        output::field("Written", path.display());
    }
    Ok(())
}

#[derive(Tabled)]
struct LineupRow {
    #[tabled(rename = "Lineup")]
    id: String,
    #[tabled(rename = "Salary")]
    salary: u32,
    #[tabled(rename = "Proj")]
    projected: String,
    #[tabled(rename = "Ceiling")]
    ceiling: String,
    #[tabled(rename = "Own%")]
    ownership: String,
    #[tabled(rename = "Leverage")]
    leverage: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
}

impl From<&Lineup> for LineupRow {
    fn from(lineup: &Lineup) -> Self {
        Self {
            id: lineup.id().to_string(),
            salary: lineup.total_salary(),
            projected: format!("{:.1}", lineup.projected_points()),
            ceiling: format!("{:.1}", lineup.ceiling_points()),
            ownership: format!("{:.1}", lineup.projected_ownership()),
            leverage: format!("{:.2}", lineup.leverage_score()),
            cluster: lineup
                .cluster_id()
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        }
    }
}

#[derive(Tabled)]
struct ExposureRow {
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Lineups")]
    count: usize,
    #[tabled(rename = "Exposure")]
    share: String,
}

fn print_summary(result: &OptimizationResult, show: usize) {
    let meta = &result.metadata;
    let stats = &result.stats;

    output::section("Portfolio");
    match meta.outcome {
        RunOutcome::Complete => output::success(&format!(
            "Built {} of {} lineups",
            meta.achieved_portfolio_size, meta.target_portfolio_size
        )),
        RunOutcome::Partial => output::warning(&format!(
            "Built {} of {} lineups",
            meta.achieved_portfolio_size, meta.target_portfolio_size
        )),
        RunOutcome::NoFeasibleLineups => {
            output::warning("No feasible lineups found");
            output::hint("check position ranges and custom rules with `rosterforge config check`");
        }
    }
    output::field("Pool", meta.pool_size);
    output::field("Attempts", meta.generation.attempts);
    output::field("Infeasible", meta.generation.infeasible);
    output::field("Rejected", meta.players_rejected);
    output::field("Time", format!("{:.1}s", meta.execution_time_seconds));
    output::field("Run id", meta.optimization_id);

    if result.portfolio.is_empty() {
        return;
    }

    output::section("Averages");
    output::field("Projected", format!("{:.2}", stats.avg_projected_points));
    output::field("Ceiling", format!("{:.2}", stats.avg_ceiling_points));
    output::field("Ownership", format!("{:.1}%", stats.avg_ownership));
    output::field("Leverage", format!("{:.2}", stats.avg_leverage_score));
    output::field("Salary", format!("${:.0}", stats.avg_salary));
    output::field("Players", stats.unique_players);

    output::section("Lineups");
    let rows: Vec<LineupRow> = result
        .portfolio
        .iter()
        .take(show)
        .map(LineupRow::from)
        .collect();
    output::table(&rows);
    if result.portfolio.len() > show {
        output::note(&format!("... {} more", result.portfolio.len() - show));
    }

    if let Some(best) = result
        .portfolio
        .iter()
        .max_by(|a, b| a.projected_points().total_cmp(&b.projected_points()))
    {
        output::section(&format!("Highest projection ({})", best.id()));
        for slot in best.slots() {
            output::field(slot.slot, &slot.player_id);
        }
    }

    output::section("Top exposures");
    let rows: Vec<ExposureRow> = stats
        .top_exposures(TOP_EXPOSURES)
        .into_iter()
        .map(|(id, count)| ExposureRow {
            player: id.to_string(),
            count,
            share: format!("{:.0}%", stats.exposure_fraction(id) * 100.0),
        })
        .collect();
    output::table(&rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(config: Option<PathBuf>) -> OptimizeArgs {
        OptimizeArgs {
            players: PathBuf::from("players.json"),
            config,
            target: Some(3),
            objective: Some("cash_game".into()),
            output: None,
            show: 10,
        }
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = resolve_config(&args(None)).unwrap();
        assert_eq!(config.optimizer.target_portfolio_size, 3);
        assert_eq!(config.optimizer.objective, "cash_game");
        assert_eq!(config.optimizer.salary_cap, 50_000);
    }

    #[test]
    fn bad_objective_override_is_rejected() {
        let mut args = args(None);
        args.objective = Some("moonshot".into());
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn player_file_accepts_both_layouts() {
        let dir = TempDir::new().unwrap();
        let record = r#"{"id":"p1","name":"A","position":"QB","team":"KC","game_id":"BUF@KC","salary":7000,"projected_points":20.0}"#;

        let bare = dir.path().join("bare.json");
        fs::write(&bare, format!("[{record}]")).unwrap();
        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, format!(r#"{{"players":[{record}]}}"#)).unwrap();

        assert_eq!(read_players(&bare).unwrap().len(), 1);
        assert_eq!(read_players(&wrapped).unwrap()[0]["id"], "p1");
    }

    #[test]
    fn malformed_player_file_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_players(&path), Err(Error::Json(_))));
    }

    #[test]
    fn bad_rows_do_not_fail_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("players.json");
        fs::write(
            &path,
            r#"[{"id":"p1","position":"QB","salary":7000.0,"projected_points":20.0},
                {"id":"p2","position":"WR","salary":6000,"projected_points":null}]"#,
        )
        .unwrap();
        assert_eq!(read_players(&path).unwrap().len(), 2);
    }
}

//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::{Config, TEMPLATE};

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your roster rules", path.display()));
    output::note(&format!(
        "2. Run: rosterforge config check {}",
        path.display()
    ));
    output::note(&format!(
        "3. Run: rosterforge optimize -p players.json -c {}",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let optimizer = &config.optimizer;

    output::section("Effective Configuration");
    output::field("Path", path.display());
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("Portfolio");
    output::field("Target", optimizer.target_portfolio_size);
    output::field("Salary cap", format!("${}", optimizer.salary_cap));
    output::field("Objective", &optimizer.objective);
    output::field("Attempts", optimizer.pool_attempts());
    output::field(
        "Budget",
        format!("{}s", optimizer.generation.generation_budget_secs),
    );

    output::section("Positions");
    for (position, range) in optimizer.positions.iter() {
        output::field(position.code(), format!("{}-{}", range.min, range.max));
    }

    output::section("Rules");
    let stacking = &optimizer.stacking_rules;
    output::field("QB stack", format!(">= {}", stacking.qb_stack_min));
    output::field("Game stack", format!("<= {}", stacking.game_stack_max));
    output::field("Team stack", format!("<= {}", stacking.team_stack_max));
    output::field(
        "Exposure",
        format!(
            "{:.0}%-{:.0}%",
            optimizer.exposure_limits.min_exposure * 100.0,
            optimizer.exposure_limits.max_exposure * 100.0
        ),
    );
    output::field("Max overlap", optimizer.uniqueness.max_overlap);
    if optimizer.custom_rules.is_empty() {
        output::note("(no custom rules)");
    } else {
        for rule in &optimizer.custom_rules {
            output::note(&format!("- {rule:?}"));
        }
    }

    Ok(())
}

/// Execute `config check`.
pub fn execute_check(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config = Config::load(path)?;
    output::success("Config file is valid");

    let positions = &config.optimizer.positions;
    if positions.min_total() > 9 || positions.max_total() < 9 {
        output::section("Warnings");
        output::warning(&format!(
            "Position ranges allow {}-{} players; every lineup needs exactly 9",
            positions.min_total(),
            positions.max_total()
        ));
    }

    output::hint(&format!("rosterforge config show {}", path.display()));
    Ok(())
}

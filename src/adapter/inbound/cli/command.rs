//! Command-line interface definitions.
//!
//! Defines the CLI structure for the rosterforge application using `clap`.
//! The CLI runs the portfolio optimizer over a player file and manages the
//! TOML configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default config file written by `config init`.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// DFS lineup portfolio optimizer
#[derive(Parser, Debug)]
#[command(name = "rosterforge")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the rosterforge CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a lineup portfolio from a player file
    Optimize(Box<OptimizeArgs>),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `rosterforge config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    #[command(alias = "validate")]
    Check(ConfigPathArg),
}

/// Arguments for the `optimize` subcommand.
#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// JSON file with the player records.
    #[arg(short, long)]
    pub players: PathBuf,

    /// Configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the target portfolio size.
    #[arg(short, long)]
    pub target: Option<usize>,

    /// Override the objective.
    #[arg(long)]
    pub objective: Option<String>,

    /// Write the full result as JSON to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Lineups shown in the summary table.
    #[arg(long, default_value_t = 10)]
    pub show: usize,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Configuration file argument shared by `config show` and `config check`.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

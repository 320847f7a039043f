//! CLI module graph.

pub mod command;
pub mod config;
pub mod optimize;
pub mod output;

use crate::error::Result;
use command::{Cli, Commands, ConfigCommand};

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Optimize(args) => optimize::execute(*args).await,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Check(args)) => config::execute_check(&args.config),
    }
}

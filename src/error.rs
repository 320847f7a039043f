//! Crate-level error types.
//!
//! Domain validation failures live in [`DomainError`]; this module wraps
//! them together with configuration, solver backend and I/O failures.
//! Infeasible or timed-out solves are outcomes, not errors.

use thiserror::Error;

use crate::domain::error::DomainError;

/// Problems with the TOML configuration or its values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The backend could not build or run a model.
    #[error("solver error: {0}")]
    Solver(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking optimization task panicked or was aborted.
    #[error("optimization task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;

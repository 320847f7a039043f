//! Domain validation errors for core domain types.
//!
//! These errors are returned when domain invariants are violated, either by
//! `try_new` constructors or by operations that cannot proceed on the data
//! they were given.
//!
//! # Examples
//!
//! ```
//! use rosterforge::domain::error::DomainError;
//! use rosterforge::domain::player::{Player, Position};
//!
//! let result = Player::try_new("p1", "Nobody", Position::Wr, "KC", "KC@BUF", 0, 10.0);
//! assert!(matches!(result, Err(DomainError::NonPositiveSalary { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Salary must be strictly positive for a player to be rostered.
    #[error("player {player_id}: salary must be positive, got {salary}")]
    NonPositiveSalary {
        /// Offending player.
        player_id: String,
        /// The invalid salary.
        salary: i64,
    },

    /// Projected points must be strictly positive for a player to be rostered.
    #[error("player {player_id}: projected points must be positive, got {points}")]
    NonPositiveProjection {
        /// Offending player.
        player_id: String,
        /// The invalid projection.
        points: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("player {player_id}: {field} is not a finite number")]
    NonFinite {
        /// Offending player.
        player_id: String,
        /// Name of the field.
        field: &'static str,
    },

    /// A numeric field was outside its allowed range.
    #[error("player {player_id}: {field} out of range, got {value}")]
    OutOfRange {
        /// Offending player.
        player_id: String,
        /// Name of the field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// A required field was null or absent.
    #[error("player {player_id}: missing {field}")]
    MissingField {
        /// Offending player.
        player_id: String,
        /// Name of the field.
        field: &'static str,
    },

    /// A row could not be read as a player record.
    #[error("player {player_id}: malformed record: {reason}")]
    MalformedRecord {
        /// Id from the row, or its position in the file.
        player_id: String,
        /// Deserializer message.
        reason: String,
    },

    /// Player ids must be unique within a pool.
    #[error("duplicate player id {player_id}")]
    DuplicatePlayer {
        /// The repeated id.
        player_id: String,
    },

    /// Position code was not one of QB, RB, WR, TE, DST.
    #[error("unknown position '{0}'")]
    UnknownPosition(String),

    /// Objective name did not match any supported strategy.
    #[error("unknown objective '{0}'")]
    UnknownObjective(String),

    /// No player survived validation, so there is nothing to optimize.
    #[error("no valid players available for optimization")]
    EmptyPlayerPool,
}

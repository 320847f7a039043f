//! Core domain types: players, lineups, portfolios and roster rules.
//!
//! Everything here is solver-agnostic. The optimizer in
//! [`crate::application::optimizer`] turns these types into integer
//! programs through the [`crate::port::outbound::solver`] port.

pub mod constraint;
pub mod error;
pub mod id;
pub mod lineup;
pub mod player;
pub mod portfolio;
pub mod rules;

pub use id::{LineupId, PlayerId};
pub use lineup::{Lineup, LineupKey, LineupValidation, RosterSlot, ROSTER_SIZE};
pub use player::{Player, PlayerPool, PlayerRecord, PlayerRejection, Position};
pub use portfolio::Portfolio;
pub use rules::{
    allowed_count, CustomRule, ExposureLimits, ExposureOverride, HybridWeights, Objective, ObjectiveParams,
    PositionLimits, PositionRange, StackingRules, UniquenessRules,
};

//! Roster-construction rules: position ranges, stacking, exposure,
//! custom clauses and the objective selector.
//!
//! All rule types deserialize from the `[optimizer]` section of the TOML
//! configuration and stay immutable for the duration of a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::PlayerId;
use super::player::Position;

/// Inclusive bounds on how many players of a position a lineup may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub min: u32,
    pub max: u32,
}

impl PositionRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(&self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }
}

/// Per-position ranges. The FLEX slot has no entry of its own: it is the
/// slack between the RB/WR/TE minimums and maximums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLimits {
    #[serde(rename = "QB", default = "default_qb")]
    pub qb: PositionRange,
    #[serde(rename = "RB", default = "default_rb")]
    pub rb: PositionRange,
    #[serde(rename = "WR", default = "default_wr")]
    pub wr: PositionRange,
    #[serde(rename = "TE", default = "default_te")]
    pub te: PositionRange,
    #[serde(rename = "DST", default = "default_dst")]
    pub dst: PositionRange,
}

const fn default_qb() -> PositionRange {
    PositionRange::new(1, 1)
}

const fn default_rb() -> PositionRange {
    PositionRange::new(2, 3)
}

const fn default_wr() -> PositionRange {
    PositionRange::new(3, 4)
}

const fn default_te() -> PositionRange {
    PositionRange::new(1, 2)
}

const fn default_dst() -> PositionRange {
    PositionRange::new(1, 1)
}

impl Default for PositionLimits {
    fn default() -> Self {
        Self {
            qb: default_qb(),
            rb: default_rb(),
            wr: default_wr(),
            te: default_te(),
            dst: default_dst(),
        }
    }
}

impl PositionLimits {
    #[must_use]
    pub const fn get(&self, position: Position) -> PositionRange {
        match position {
            Position::Qb => self.qb,
            Position::Rb => self.rb,
            Position::Wr => self.wr,
            Position::Te => self.te,
            Position::Dst => self.dst,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, PositionRange)> + '_ {
        Position::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    /// Sum of the position minimums.
    #[must_use]
    pub fn min_total(&self) -> u32 {
        self.iter().map(|(_, r)| r.min).sum()
    }

    /// Sum of the position maximums.
    #[must_use]
    pub fn max_total(&self) -> u32 {
        self.iter().map(|(_, r)| r.max).sum()
    }
}

/// Correlation rules applied to every lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackingRules {
    /// Pass-catchers from the QB's team required when the QB is rostered.
    /// Zero disables the rule.
    #[serde(default = "default_qb_stack_min")]
    pub qb_stack_min: u32,
    /// Maximum players from one game. Values of 9 or more disable the rule.
    #[serde(default = "default_game_stack_max")]
    pub game_stack_max: u32,
    /// Maximum players from one team. Values of 9 or more disable the rule.
    #[serde(default = "default_team_stack_max")]
    pub team_stack_max: u32,
}

const fn default_qb_stack_min() -> u32 {
    1
}

const fn default_game_stack_max() -> u32 {
    4
}

const fn default_team_stack_max() -> u32 {
    5
}

impl Default for StackingRules {
    fn default() -> Self {
        Self {
            qb_stack_min: default_qb_stack_min(),
            game_stack_max: default_game_stack_max(),
            team_stack_max: default_team_stack_max(),
        }
    }
}

/// Per-player override of the global exposure fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureOverride {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Portfolio-level exposure limits, as fractions of the lineup count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureLimits {
    #[serde(default = "default_max_exposure")]
    pub max_exposure: f64,
    #[serde(default)]
    pub min_exposure: f64,
    /// Lineup count that must be exceeded before minimum exposure starts
    /// forcing players in. Early solves are left alone so the first few
    /// lineups are not dictated by a ratio computed over a tiny sample.
    #[serde(default = "default_min_exposure_warmup")]
    pub min_exposure_warmup: usize,
    #[serde(default)]
    pub players: BTreeMap<PlayerId, ExposureOverride>,
}

const fn default_max_exposure() -> f64 {
    0.5
}

const fn default_min_exposure_warmup() -> usize {
    10
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            max_exposure: default_max_exposure(),
            min_exposure: 0.0,
            min_exposure_warmup: default_min_exposure_warmup(),
            players: BTreeMap::new(),
        }
    }
}

impl ExposureLimits {
    /// Effective `(min, max)` fractions for one player.
    #[must_use]
    pub fn bounds_for(&self, player: &PlayerId) -> (f64, f64) {
        let custom = self.players.get(player).copied().unwrap_or_default();
        (
            custom.min.unwrap_or(self.min_exposure),
            custom.max.unwrap_or(self.max_exposure),
        )
    }

    /// Most lineups one player may appear in across a portfolio of `size`.
    /// A positive fraction always allows at least one appearance.
    #[must_use]
    pub fn portfolio_cap(&self, player: &PlayerId, size: usize) -> usize {
        let (_, max) = self.bounds_for(player);
        if max <= 0.0 {
            0
        } else {
            allowed_count(max, size).max(1)
        }
    }
}

/// ⌊fraction · total⌋, nudged so exact products aren't lost to rounding.
#[must_use]
pub fn allowed_count(fraction: f64, total: usize) -> usize {
    let raw = (fraction * total as f64 + 1e-9).floor();
    if raw <= 0.0 {
        0
    } else {
        raw as usize
    }
}

/// Bound on how many players a new lineup may share with any earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessRules {
    #[serde(default = "default_max_overlap")]
    pub max_overlap: u32,
}

const fn default_max_overlap() -> u32 {
    8
}

impl Default for UniquenessRules {
    fn default() -> Self {
        Self {
            max_overlap: default_max_overlap(),
        }
    }
}

/// User-defined single-clause rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomRule {
    /// Player must appear in every lineup.
    ForcePlayer { player_id: PlayerId },
    /// Player may not appear in any lineup.
    ExcludePlayer { player_id: PlayerId },
    /// Lineup salary must be at least this much.
    MinSalary { min_salary: u32 },
    /// At most `max_players` from `team` per lineup.
    MaxTeamExposure {
        team: String,
        #[serde(default = "default_max_team_players")]
        max_players: u32,
    },
}

const fn default_max_team_players() -> u32 {
    3
}

/// Blend weights for [`Objective::Hybrid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    #[serde(default = "default_leverage_weight")]
    pub leverage: f64,
    #[serde(default = "default_points_weight")]
    pub projected_points: f64,
    #[serde(default = "default_value_weight")]
    pub value: f64,
}

const fn default_leverage_weight() -> f64 {
    0.5
}

const fn default_points_weight() -> f64 {
    0.3
}

const fn default_value_weight() -> f64 {
    0.2
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            leverage: default_leverage_weight(),
            projected_points: default_points_weight(),
            value: default_value_weight(),
        }
    }
}

/// Optional parameters for the parameterized objectives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveParams {
    #[serde(default)]
    pub risk_tolerance: Option<f64>,
    #[serde(default)]
    pub weights: Option<HybridWeights>,
}

const DEFAULT_RISK_TOLERANCE: f64 = 0.5;

/// Per-player scoring strategy maximized by each lineup solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    LeveragedCeiling,
    ProjectedPoints,
    CeilingPoints,
    Value,
    Hybrid { weights: HybridWeights },
    RiskAdjusted { risk_tolerance: f64 },
    Tournament,
    CashGame,
}

impl Default for Objective {
    fn default() -> Self {
        Self::LeveragedCeiling
    }
}

impl Objective {
    /// Resolve an objective by name. Unknown names are an error rather than
    /// a silent fallback.
    pub fn from_name(name: &str, params: &ObjectiveParams) -> Result<Self, DomainError> {
        let objective = match name.trim().to_ascii_lowercase().as_str() {
            "" | "leveraged_ceiling" => Self::LeveragedCeiling,
            "projected_points" => Self::ProjectedPoints,
            "ceiling_points" => Self::CeilingPoints,
            "value" | "value_based" => Self::Value,
            "hybrid" => Self::Hybrid {
                weights: params.weights.unwrap_or_default(),
            },
            "risk_adjusted" => Self::RiskAdjusted {
                risk_tolerance: params.risk_tolerance.unwrap_or(DEFAULT_RISK_TOLERANCE),
            },
            "tournament" => Self::Tournament,
            "cash_game" => Self::CashGame,
            other => return Err(DomainError::UnknownObjective(other.to_string())),
        };
        Ok(objective)
    }

    /// Canonical name, as accepted by [`Objective::from_name`].
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LeveragedCeiling => "leveraged_ceiling",
            Self::ProjectedPoints => "projected_points",
            Self::CeilingPoints => "ceiling_points",
            Self::Value => "value",
            Self::Hybrid { .. } => "hybrid",
            Self::RiskAdjusted { .. } => "risk_adjusted",
            Self::Tournament => "tournament",
            Self::CashGame => "cash_game",
        }
    }
}

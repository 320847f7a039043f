//! Players and the validated per-run player pool.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::PlayerId;

/// Ownership assumed when the upstream producer supplied none.
pub const DEFAULT_OWNERSHIP: f64 = 10.0;

/// Fraction of the projection used as the floor when none was supplied.
const DEFAULT_FLOOR_RATIO: f64 = 0.5;

/// Roster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Dst,
}

impl Position {
    /// All positions in roster order.
    pub const ALL: [Position; 5] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Dst,
    ];

    /// Short code as used on the salary sheet.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Dst => "DST",
        }
    }

    /// Index into [`Position::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Position::Qb => 0,
            Position::Rb => 1,
            Position::Wr => 2,
            Position::Te => 3,
            Position::Dst => 4,
        }
    }

    /// True for positions that can fill the FLEX slot.
    #[must_use]
    pub const fn is_flex_eligible(self) -> bool {
        matches!(self, Position::Rb | Position::Wr | Position::Te)
    }

    /// True for positions that catch passes from a quarterback.
    #[must_use]
    pub const fn is_pass_catcher(self) -> bool {
        matches!(self, Position::Wr | Position::Te)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::Qb),
            "RB" => Ok(Position::Rb),
            "WR" => Ok(Position::Wr),
            "TE" => Ok(Position::Te),
            "DST" | "D/ST" | "DEF" => Ok(Position::Dst),
            other => Err(DomainError::UnknownPosition(other.to_string())),
        }
    }
}

/// Player record as delivered by the upstream projection and ownership
/// producers. Optional fields fall back to the documented defaults.
///
/// Salary and projection are optional on the wire so that a null or
/// missing value rejects only that row.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    #[serde(alias = "player_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub projected_points: Option<f64>,
    #[serde(default)]
    pub ceiling_points: Option<f64>,
    #[serde(default)]
    pub floor_points: Option<f64>,
    #[serde(default)]
    pub projected_ownership: Option<f64>,
}

/// A rosterable player with projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    position: Position,
    team: String,
    game_id: String,
    salary: u32,
    projected_points: f64,
    ceiling_points: f64,
    floor_points: f64,
    projected_ownership: f64,
}

impl Player {
    /// Create a player, enforcing `salary > 0` and `projected_points > 0`.
    ///
    /// Ceiling defaults to the projection, floor to half the projection and
    /// ownership to [`DEFAULT_OWNERSHIP`].
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        team: impl Into<String>,
        game_id: impl Into<String>,
        salary: i64,
        projected_points: f64,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if !projected_points.is_finite() {
            return Err(DomainError::NonFinite {
                player_id: id,
                field: "projected_points",
            });
        }
        let Some(checked_salary) = u32::try_from(salary).ok().filter(|s| *s > 0) else {
            return Err(DomainError::NonPositiveSalary {
                player_id: id,
                salary,
            });
        };
        if projected_points <= 0.0 {
            return Err(DomainError::NonPositiveProjection {
                player_id: id,
                points: projected_points,
            });
        }

        Ok(Self {
            id: PlayerId::new(id),
            name: name.into(),
            position,
            team: team.into(),
            game_id: game_id.into(),
            salary: checked_salary,
            projected_points,
            ceiling_points: projected_points,
            floor_points: projected_points * DEFAULT_FLOOR_RATIO,
            projected_ownership: DEFAULT_OWNERSHIP,
        })
    }

    /// Validate an upstream record into a player.
    pub fn try_from_record(record: PlayerRecord) -> Result<Self, DomainError> {
        let missing = |field| DomainError::MissingField {
            player_id: record.id.clone(),
            field,
        };
        let salary = record.salary.ok_or_else(|| missing("salary"))?;
        let projected_points = record
            .projected_points
            .ok_or_else(|| missing("projected_points"))?;
        let salary = whole_salary(&record.id, salary)?;

        let position: Position = record.position.parse()?;
        let player = Self::try_new(
            record.id,
            record.name,
            position,
            record.team,
            record.game_id,
            salary,
            projected_points,
        )?;

        let player = match record.ceiling_points {
            Some(ceiling) => player.with_ceiling(ceiling)?,
            None => player,
        };
        let player = match record.floor_points {
            Some(floor) => player.with_floor(floor)?,
            None => player,
        };
        match record.projected_ownership {
            Some(ownership) => player.with_ownership(ownership),
            None => Ok(player),
        }
    }

    /// Set the ceiling projection.
    pub fn with_ceiling(mut self, ceiling: f64) -> Result<Self, DomainError> {
        self.ceiling_points = self.checked_points("ceiling_points", ceiling)?;
        Ok(self)
    }

    /// Set the floor projection.
    pub fn with_floor(mut self, floor: f64) -> Result<Self, DomainError> {
        self.floor_points = self.checked_points("floor_points", floor)?;
        Ok(self)
    }

    /// Set the projected ownership percentage (0-100).
    pub fn with_ownership(mut self, ownership: f64) -> Result<Self, DomainError> {
        let ownership = self.checked_points("projected_ownership", ownership)?;
        if ownership > 100.0 {
            return Err(DomainError::OutOfRange {
                player_id: self.id.to_string(),
                field: "projected_ownership",
                value: ownership,
            });
        }
        self.projected_ownership = ownership;
        Ok(self)
    }

    fn checked_points(&self, field: &'static str, value: f64) -> Result<f64, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NonFinite {
                player_id: self.id.to_string(),
                field,
            });
        }
        if value < 0.0 {
            return Err(DomainError::OutOfRange {
                player_id: self.id.to_string(),
                field,
                value,
            });
        }
        Ok(value)
    }

    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn team(&self) -> &str {
        &self.team
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[must_use]
    pub fn salary(&self) -> u32 {
        self.salary
    }

    #[must_use]
    pub fn projected_points(&self) -> f64 {
        self.projected_points
    }

    #[must_use]
    pub fn ceiling_points(&self) -> f64 {
        self.ceiling_points
    }

    #[must_use]
    pub fn floor_points(&self) -> f64 {
        self.floor_points
    }

    #[must_use]
    pub fn projected_ownership(&self) -> f64 {
        self.projected_ownership
    }
}

/// Salaries arrive as JSON numbers; `7000` and `7000.0` are the same salary.
fn whole_salary(player_id: &str, salary: f64) -> Result<i64, DomainError> {
    if !salary.is_finite() {
        return Err(DomainError::NonFinite {
            player_id: player_id.to_string(),
            field: "salary",
        });
    }
    if salary.fract() != 0.0 || salary.abs() > f64::from(u32::MAX) {
        return Err(DomainError::OutOfRange {
            player_id: player_id.to_string(),
            field: "salary",
            value: salary,
        });
    }
    Ok(salary as i64)
}

/// A player record that did not make it into the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRejection {
    pub player_id: String,
    pub error: DomainError,
}

/// Validated, immutable collection of candidate players for one run.
///
/// Each player's index in the pool doubles as its decision-variable index
/// in the lineup program.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    /// Build a pool from already-validated players. Later duplicates of an
    /// id are rejected.
    #[must_use]
    pub fn new(players: Vec<Player>) -> (Self, Vec<PlayerRejection>) {
        let mut pool = Self::default();
        let mut rejected = Vec::new();

        for player in players {
            if pool.index.contains_key(player.id()) {
                rejected.push(PlayerRejection {
                    player_id: player.id().to_string(),
                    error: DomainError::DuplicatePlayer {
                        player_id: player.id().to_string(),
                    },
                });
                continue;
            }
            pool.index.insert(player.id().clone(), pool.players.len());
            pool.players.push(player);
        }

        (pool, rejected)
    }

    /// Read loosely-typed JSON rows and build a pool from the ones that
    /// validate. A row that is not a player record at all is rejected on
    /// its own, under its id when it has one and its position otherwise.
    #[must_use]
    pub fn from_rows(rows: Vec<serde_json::Value>) -> (Self, Vec<PlayerRejection>) {
        let mut records = Vec::with_capacity(rows.len());
        let mut malformed = Vec::new();

        for (n, row) in rows.into_iter().enumerate() {
            let player_id = ["player_id", "id"]
                .iter()
                .find_map(|key| row.get(*key).and_then(serde_json::Value::as_str))
                .map_or_else(|| format!("row {}", n + 1), str::to_string);
            match serde_json::from_value::<PlayerRecord>(row) {
                Ok(record) => records.push(record),
                Err(err) => malformed.push(PlayerRejection {
                    player_id: player_id.clone(),
                    error: DomainError::MalformedRecord {
                        player_id,
                        reason: err.to_string(),
                    },
                }),
            }
        }

        let (pool, mut rejected) = Self::from_records(records);
        malformed.append(&mut rejected);
        (pool, malformed)
    }

    /// Validate raw records and build a pool from the survivors.
    #[must_use]
    pub fn from_records(records: Vec<PlayerRecord>) -> (Self, Vec<PlayerRejection>) {
        let mut valid = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for record in records {
            let player_id = record.id.clone();
            match Player::try_from_record(record) {
                Ok(player) => valid.push(player),
                Err(error) => rejected.push(PlayerRejection { player_id, error }),
            }
        }

        let (pool, duplicates) = Self::new(valid);
        rejected.extend(duplicates);
        (pool, rejected)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Variable index of a player id.
    #[must_use]
    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Indices of players at a position.
    pub fn indices_at(&self, position: Position) -> impl Iterator<Item = usize> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.position() == position)
            .map(|(i, _)| i)
    }

    /// Indices of players on a team.
    pub fn indices_on_team<'a>(&'a self, team: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.players
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.team() == team)
            .map(|(i, _)| i)
    }

    /// Distinct non-empty team codes, sorted.
    #[must_use]
    pub fn teams(&self) -> BTreeSet<&str> {
        self.players
            .iter()
            .map(Player::team)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Player indices grouped by non-empty game id, with the teams seen in
    /// each game.
    #[must_use]
    pub fn games(&self) -> BTreeMap<&str, (BTreeSet<&str>, Vec<usize>)> {
        let mut games: BTreeMap<&str, (BTreeSet<&str>, Vec<usize>)> = BTreeMap::new();
        for (i, player) in self.players.iter().enumerate() {
            if player.game_id().is_empty() {
                continue;
            }
            let entry = games.entry(player.game_id()).or_default();
            if !player.team().is_empty() {
                entry.0.insert(player.team());
            }
            entry.1.push(i);
        }
        games
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, position: &str, salary: i64, projected: f64) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: format!("Player {id}"),
            position: position.to_string(),
            team: "KC".to_string(),
            game_id: "KC@BUF".to_string(),
            salary: Some(salary as f64),
            projected_points: Some(projected),
            ceiling_points: None,
            floor_points: None,
            projected_ownership: None,
        }
    }

    #[test]
    fn record_defaults_fill_missing_fields() {
        let player = Player::try_from_record(record("p1", "wr", 6000, 14.0)).unwrap();
        assert_eq!(player.position(), Position::Wr);
        assert_eq!(player.ceiling_points(), 14.0);
        assert_eq!(player.floor_points(), 7.0);
        assert_eq!(player.projected_ownership(), DEFAULT_OWNERSHIP);
    }

    #[test]
    fn position_aliases_parse() {
        assert_eq!("D/ST".parse::<Position>().unwrap(), Position::Dst);
        assert_eq!("def".parse::<Position>().unwrap(), Position::Dst);
        assert!(matches!(
            "K".parse::<Position>(),
            Err(DomainError::UnknownPosition(_))
        ));
    }

    #[test]
    fn invalid_rows_are_filtered() {
        let records = vec![
            record("ok", "QB", 7000, 20.0),
            record("free", "RB", 0, 10.0),
            record("zero", "RB", 5000, 0.0),
            record("nan", "WR", 5000, f64::NAN),
            record("kicker", "K", 4000, 8.0),
        ];
        let (pool, rejected) = PlayerPool::from_records(records);

        assert_eq!(pool.len(), 1);
        assert_eq!(rejected.len(), 4);
        assert!(pool.index_of(&PlayerId::from("ok")).is_some());
    }

    #[test]
    fn missing_numbers_reject_only_their_row() {
        let mut no_salary = record("no-salary", "RB", 5000, 10.0);
        no_salary.salary = None;
        let mut no_points = record("no-points", "RB", 5000, 10.0);
        no_points.projected_points = None;
        let mut fractional = record("half", "WR", 5000, 10.0);
        fractional.salary = Some(4999.5);

        let (pool, rejected) = PlayerPool::from_records(vec![
            record("ok", "QB", 7000, 20.0),
            no_salary,
            no_points,
            fractional,
        ]);

        assert_eq!(pool.len(), 1);
        assert_eq!(
            rejected[0].error,
            DomainError::MissingField {
                player_id: "no-salary".into(),
                field: "salary"
            }
        );
        assert!(matches!(
            rejected[1].error,
            DomainError::MissingField {
                field: "projected_points",
                ..
            }
        ));
        assert!(matches!(
            rejected[2].error,
            DomainError::OutOfRange { field: "salary", .. }
        ));
    }

    #[test]
    fn json_rows_are_read_one_at_a_time() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"player_id":"a","name":"A","position":"QB","salary":7000.0,"projected_points":20.5},
                {"player_id":"b","name":"B","position":"WR","salary":6000,"projected_points":null},
                {"player_id":"c","name":"C","position":"WR","salary":"lots","projected_points":9.0},
                {"name":"nobody","position":"TE"}
            ]"#,
        )
        .unwrap();

        let (pool, rejected) = PlayerPool::from_rows(rows);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].salary(), 7000);
        let ids: Vec<&str> = rejected.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, ["c", "row 4", "b"]);
        assert!(matches!(
            rejected[0].error,
            DomainError::MalformedRecord { .. }
        ));
        assert!(matches!(
            rejected[2].error,
            DomainError::MissingField { .. }
        ));
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut second = record("dup", "WR", 3000, 5.0);
        second.name = "Second".to_string();
        let (pool, rejected) =
            PlayerPool::from_records(vec![record("dup", "WR", 4000, 9.0), second]);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].salary(), 4000);
        assert!(matches!(
            rejected[0].error,
            DomainError::DuplicatePlayer { .. }
        ));
    }

    #[test]
    fn ownership_above_hundred_is_rejected() {
        let mut r = record("p", "TE", 4000, 9.0);
        r.projected_ownership = Some(140.0);
        assert!(matches!(
            Player::try_from_record(r),
            Err(DomainError::OutOfRange { .. })
        ));
    }

    #[test]
    fn games_group_teams_and_players() {
        let mut away = record("a", "QB", 7000, 20.0);
        away.team = "BUF".to_string();
        let (pool, _) = PlayerPool::from_records(vec![away, record("h", "WR", 6000, 15.0)]);
        let games = pool.games();
        let (teams, players) = &games["KC@BUF"];
        assert_eq!(teams.len(), 2);
        assert_eq!(players.len(), 2);
    }
}

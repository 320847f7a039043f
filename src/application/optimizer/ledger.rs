//! Accepted-lineup bookkeeping for pool generation.

use std::collections::HashSet;

use crate::domain::lineup::{Lineup, LineupKey};
use crate::domain::player::PlayerPool;

/// Lineups accepted so far plus the per-player usage counts that drive the
/// exposure and uniqueness rows of the next solve.
#[derive(Debug, Clone)]
pub struct LineupLedger {
    lineups: Vec<Lineup>,
    selections: Vec<Vec<usize>>,
    keys: HashSet<LineupKey>,
    usage: Vec<usize>,
}

impl LineupLedger {
    /// Empty ledger for a pool of `pool_len` players.
    #[must_use]
    pub fn new(pool_len: usize) -> Self {
        Self {
            lineups: Vec::new(),
            selections: Vec::new(),
            keys: HashSet::new(),
            usage: vec![0; pool_len],
        }
    }

    /// Record an accepted lineup. Returns `false` and leaves the ledger
    /// untouched when the same player set was already recorded or a player
    /// is not in `pool`.
    pub fn record(&mut self, lineup: Lineup, pool: &PlayerPool) -> bool {
        let key = lineup.key();
        if self.keys.contains(&key) {
            return false;
        }
        let selection: Option<Vec<usize>> = lineup
            .players()
            .iter()
            .map(|p| pool.index_of(p.id()))
            .collect();
        let Some(selection) = selection else {
            return false;
        };

        for &i in &selection {
            if let Some(count) = self.usage.get_mut(i) {
                *count += 1;
            }
        }
        self.keys.insert(key);
        self.selections.push(selection);
        self.lineups.push(lineup);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lineups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lineups.is_empty()
    }

    /// Lineups containing the player at `index`.
    #[must_use]
    pub fn usage(&self, index: usize) -> usize {
        self.usage.get(index).copied().unwrap_or(0)
    }

    /// Pool indices of each accepted lineup, in acceptance order.
    #[must_use]
    pub fn selections(&self) -> &[Vec<usize>] {
        &self.selections
    }

    #[must_use]
    pub fn into_lineups(self) -> Vec<Lineup> {
        self.lineups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::LineupId;
    use crate::domain::rules::PositionLimits;
    use crate::testkit::domain::standard_roster;

    #[test]
    fn record_counts_usage_and_rejects_repeats() {
        let roster = standard_roster("a");
        let (pool, _) = PlayerPool::new(roster.clone());
        let mut ledger = LineupLedger::new(pool.len());

        let lineup = Lineup::new(
            LineupId::new(1),
            roster,
            50_000,
            &PositionLimits::default(),
        );
        assert!(ledger.record(lineup.clone(), &pool));
        assert!(!ledger.record(lineup, &pool));

        assert_eq!(ledger.len(), 1);
        assert!((0..pool.len()).all(|i| ledger.usage(i) == 1));
        assert_eq!(ledger.selections()[0].len(), 9);
    }

    #[test]
    fn lineup_outside_pool_is_not_recorded() {
        let (pool, _) = PlayerPool::new(standard_roster("a"));
        let mut ledger = LineupLedger::new(pool.len());
        let stranger = Lineup::new(
            LineupId::new(1),
            standard_roster("b"),
            50_000,
            &PositionLimits::default(),
        );
        assert!(!ledger.record(stranger, &pool));
        assert!(ledger.is_empty());
    }
}

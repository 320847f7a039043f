//! Final lineup portfolio.

use std::collections::HashSet;

use serde::Serialize;

use super::lineup::{Lineup, LineupKey};

/// Ordered collection of distinct lineups handed to downstream consumers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Portfolio {
    lineups: Vec<Lineup>,
}

impl Portfolio {
    /// Build a portfolio. Lineups whose player set repeats an earlier one
    /// are dropped.
    #[must_use]
    pub fn new(lineups: Vec<Lineup>) -> Self {
        let mut seen: HashSet<LineupKey> = HashSet::with_capacity(lineups.len());
        let lineups = lineups
            .into_iter()
            .filter(|lineup| seen.insert(lineup.key()))
            .collect();
        Self { lineups }
    }

    #[must_use]
    pub fn lineups(&self) -> &[Lineup] {
        &self.lineups
    }

    #[must_use]
    pub fn into_lineups(self) -> Vec<Lineup> {
        self.lineups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lineups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lineups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lineup> {
        self.lineups.iter()
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a Lineup;
    type IntoIter = std::slice::Iter<'a, Lineup>;

    fn into_iter(self) -> Self::IntoIter {
        self.lineups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::LineupId;
    use crate::domain::rules::PositionLimits;
    use crate::testkit::domain::standard_roster;

    #[test]
    fn repeated_player_sets_are_dropped() {
        let limits = PositionLimits::default();
        let a = Lineup::new(LineupId::new(1), standard_roster("a"), 50_000, &limits);
        let mut shuffled = standard_roster("a");
        shuffled.rotate_left(3);
        let b = Lineup::new(LineupId::new(2), shuffled, 50_000, &limits);
        let c = Lineup::new(LineupId::new(3), standard_roster("c"), 50_000, &limits);

        let portfolio = Portfolio::new(vec![a, b, c]);
        let ids: Vec<u32> = portfolio.iter().map(|l| l.id().value()).collect();
        assert_eq!(ids, [1, 3]);
    }
}

//! Pick a structurally diverse subset of the candidate pool.
//!
//! Lineups are described by a small numeric feature vector, standardized,
//! and clustered into `k` groups. The lineup closest to each cluster's
//! centroid represents that cluster in the portfolio.

use std::collections::HashMap;

use tracing::{debug, info};

use super::config::DiversificationConfig;
use super::kmeans::{squared_distance, KMeans};
use crate::domain::id::PlayerId;
use crate::domain::lineup::Lineup;
use crate::domain::rules::ExposureLimits;

/// Length of [`features`].
pub const FEATURE_COUNT: usize = 12;

/// Salary, points, ceiling, ownership, leverage, per-position counts, the
/// largest single-team stack and the spread of salaries.
#[must_use]
pub fn features(lineup: &Lineup) -> [f64; FEATURE_COUNT] {
    let [qb, rb, wr, te, dst] = lineup.position_counts();
    [
        f64::from(lineup.total_salary()),
        lineup.projected_points(),
        lineup.ceiling_points(),
        lineup.projected_ownership(),
        lineup.leverage_score(),
        f64::from(qb),
        f64::from(rb),
        f64::from(wr),
        f64::from(te),
        f64::from(dst),
        f64::from(lineup.max_team_stack()),
        lineup.salary_std_dev(),
    ]
}

/// Scale each column to zero mean and unit population variance in place.
/// Constant columns are only centered.
pub fn standardize(rows: &mut [Vec<f64>]) {
    let Some(width) = rows.first().map(Vec::len) else {
        return;
    };
    let n = rows.len() as f64;
    for col in 0..width {
        let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
        let variance = rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        for row in rows.iter_mut() {
            row[col] -= mean;
            if std_dev > f64::EPSILON {
                row[col] /= std_dev;
            }
        }
    }
}

/// Reduces a candidate pool to at most `k` representative lineups.
#[derive(Debug, Clone)]
pub struct PortfolioDiversifier {
    k: usize,
    config: DiversificationConfig,
    exposure: Option<ExposureLimits>,
}

impl PortfolioDiversifier {
    #[must_use]
    pub fn new(k: usize, config: DiversificationConfig) -> Self {
        Self {
            k,
            config,
            exposure: None,
        }
    }

    /// Cap player appearances in the selected portfolio at
    /// [`ExposureLimits::portfolio_cap`] for `k` lineups.
    #[must_use]
    pub fn with_exposure_limits(mut self, limits: ExposureLimits) -> Self {
        self.exposure = Some(limits);
        self
    }

    /// Select one lineup per non-empty cluster, ordered by cluster id.
    ///
    /// Each cluster is represented by its member nearest the centroid that
    /// keeps every player within the exposure cap. When a cluster has no
    /// such member, its slot goes to the nearest remaining eligible lineup
    /// of any cluster, appended after the representatives. A pool no larger than `k` is returned whole,
    /// each lineup tagged as its own cluster at distance zero.
    #[must_use]
    pub fn diversify(&self, pool: Vec<Lineup>) -> Vec<Lineup> {
        if self.k == 0 {
            return Vec::new();
        }
        if pool.len() <= self.k {
            debug!(
                pool = pool.len(),
                k = self.k,
                "Pool within target, skipping clustering"
            );
            return pool
                .into_iter()
                .enumerate()
                .map(|(i, lineup)| lineup.with_cluster(i, 0.0))
                .collect();
        }

        let mut rows: Vec<Vec<f64>> = pool.iter().map(|l| features(l).to_vec()).collect();
        standardize(&mut rows);

        let fit = KMeans {
            k: self.k,
            seed: self.config.seed,
            n_init: self.config.n_init,
            max_iterations: self.config.max_iterations,
        }
        .fit(&rows);

        // Members of each cluster as (pool index, distance), nearest first.
        let mut members: Vec<Vec<(usize, f64)>> = vec![Vec::new(); fit.centroids.len()];
        for (i, (row, &label)) in rows.iter().zip(&fit.labels).enumerate() {
            let Some(centroid) = fit.centroids.get(label) else {
                continue;
            };
            members[label].push((i, squared_distance(row, centroid).sqrt()));
        }
        for cluster in &mut members {
            cluster.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        }

        let mut usage = ExposureTally::default();
        let mut picks: Vec<(usize, usize, f64)> = Vec::with_capacity(self.k);
        let mut taken = vec![false; pool.len()];
        let mut unfilled = 0;
        for (cluster, candidates) in members.iter().enumerate() {
            if candidates.is_empty() {
                continue;
            }
            let pick = candidates
                .iter()
                .find(|(i, _)| self.admits(&usage, &pool[*i]));
            match pick {
                Some(&(i, distance)) => {
                    usage.add(&pool[i]);
                    taken[i] = true;
                    picks.push((i, cluster, distance));
                }
                None => unfilled += 1,
            }
        }

        if unfilled > 0 {
            let mut rest: Vec<(usize, usize, f64)> = members
                .iter()
                .enumerate()
                .flat_map(|(cluster, c)| c.iter().map(move |&(i, d)| (i, cluster, d)))
                .filter(|(i, _, _)| !taken[*i])
                .collect();
            rest.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));
            let before = picks.len();
            for (i, cluster, distance) in rest {
                if picks.len() - before == unfilled {
                    break;
                }
                if self.admits(&usage, &pool[i]) {
                    usage.add(&pool[i]);
                    picks.push((i, cluster, distance));
                }
            }
            debug!(
                unfilled,
                backfilled = picks.len() - before,
                "Clusters had no lineup within exposure caps"
            );
        }

        let mut slots: Vec<Option<Lineup>> = pool.into_iter().map(Some).collect();
        let portfolio: Vec<Lineup> = picks
            .into_iter()
            .filter_map(|(i, cluster, distance)| {
                slots[i].take().map(|l| l.with_cluster(cluster, distance))
            })
            .collect();

        info!(
            clusters = fit.centroids.len(),
            selected = portfolio.len(),
            inertia = fit.inertia,
            "Diversified lineup pool"
        );
        portfolio
    }

    /// Whether adding `lineup` keeps every one of its players within cap.
    fn admits(&self, usage: &ExposureTally, lineup: &Lineup) -> bool {
        let Some(limits) = &self.exposure else {
            return true;
        };
        lineup
            .players()
            .iter()
            .all(|p| usage.count(p.id()) < limits.portfolio_cap(p.id(), self.k))
    }
}

/// Appearances per player among the lineups picked so far.
#[derive(Debug, Default)]
struct ExposureTally(HashMap<PlayerId, usize>);

impl ExposureTally {
    fn add(&mut self, lineup: &Lineup) {
        for player in lineup.players() {
            *self.0.entry(player.id().clone()).or_default() += 1;
        }
    }

    fn count(&self, id: &PlayerId) -> usize {
        self.0.get(id).copied().unwrap_or(0)
    }
}

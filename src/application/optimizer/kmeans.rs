//! Seeded k-means with k-means++ initialization.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Settings for a k-means fit.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    pub k: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
}

/// Result of the best of `n_init` runs.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
}

impl KMeans {
    /// Cluster `data`. `k` is clamped to the number of points; the same seed
    /// and input always give the same fit.
    #[must_use]
    pub fn fit(&self, data: &[Vec<f64>]) -> KMeansFit {
        let k = self.k.min(data.len());
        if k == 0 {
            return KMeansFit {
                labels: vec![0; data.len()],
                centroids: Vec::new(),
                inertia: 0.0,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.n_init.max(1) {
            let centroids = init_plus_plus(data, k, &mut rng);
            let fit = lloyd(data, centroids, self.max_iterations.max(1));
            // Strict comparison keeps the earliest of equally good runs.
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.unwrap_or_else(|| KMeansFit {
            labels: vec![0; data.len()],
            centroids: Vec::new(),
            inertia: 0.0,
        })
    }
}

#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index and squared distance of the nearest centroid. Ties go to the lower
/// index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (j, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

fn init_plus_plus(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut chosen = vec![false; data.len()];
    let first = rng.gen_range(0..data.len());
    chosen[first] = true;
    let mut centroids = vec![data[first].clone()];

    while centroids.len() < k {
        let weights: Vec<f64> = data.iter().map(|p| nearest(p, &centroids).1).collect();
        let total: f64 = weights.iter().sum();

        let next = if total > 0.0 {
            let threshold = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (i, w) in weights.iter().enumerate() {
                cumulative += w;
                if *w > 0.0 && cumulative >= threshold {
                    pick = Some(i);
                    break;
                }
            }
            pick.or_else(|| weights.iter().rposition(|w| *w > 0.0))
        } else {
            None
        };
        // Every remaining point coincides with a centroid: take the first
        // unused one so k distinct indices are still seeded.
        let next = next.or_else(|| chosen.iter().position(|c| !c)).unwrap_or(0);

        chosen[next] = true;
        centroids.push(data[next].clone());
    }
    centroids
}

fn lloyd(data: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, max_iterations: usize) -> KMeansFit {
    let dims = data.first().map_or(0, Vec::len);
    let mut labels = vec![usize::MAX; data.len()];

    for _ in 0..max_iterations {
        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(data) {
            let (j, _) = nearest(point, &centroids);
            if *label != j {
                *label = j;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dims]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (&label, point) in labels.iter().zip(data) {
            counts[label] += 1;
            for (s, x) in sums[label].iter_mut().zip(point) {
                *s += x;
            }
        }
        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            // Empty clusters keep their previous centroid.
            if count > 0 {
                *centroid = sum.into_iter().map(|s| s / count as f64).collect();
            }
        }
    }

    let inertia = labels
        .iter()
        .zip(data)
        .map(|(&j, point)| squared_distance(point, &centroids[j]))
        .sum();

    KMeansFit {
        labels,
        centroids,
        inertia,
    }
}

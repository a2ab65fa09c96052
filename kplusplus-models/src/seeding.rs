use kplusplus_core::{squared_euclidean, CenterSet, Dataset, Float, Result};
use rand::Rng;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "rng"))]
compile_error!("K-Means++ seeding requires the 'rng' feature for random initialization");

/// Chooses `k` initial centers with **K-Means++**.
///
/// # Algorithm
///
/// 1. Choose the first center uniformly at random from the data points
/// 2. For each subsequent center:
///    - Weight every point by the squared distance to its nearest chosen center
///    - Sample the next center with probability proportional to that weight
///    - If every weight is zero (all points coincide with chosen centers), sample
///      uniformly instead
///
/// Points already chosen have weight `0`, so distinct points are never picked
/// twice. Nothing is removed from the candidate list; indices stay stable.
///
/// # Parameters
///
/// - `data`: Validated dataset of `n` points
/// - `k`: Number of centers, `1 <= k <= n`
/// - `rng`: Random source; seed it for reproducible centers
///
/// # Returns
///
/// A [`CenterSet`] of `k` points in selection order.
///
/// # Errors
///
/// - [`ClusterError::InvalidK`](kplusplus_core::ClusterError::InvalidK) if `k == 0` or `k > n`
///
/// # Complexity
///
/// Each point's minimum squared distance is kept across steps and only compared
/// against the newest center, so seeding costs `O(n * k * d)`.
pub fn kmeans_plusplus<R>(data: &Dataset, k: usize, rng: &mut R) -> Result<CenterSet>
where
    R: Rng + ?Sized,
{
    let indices = kmeans_plusplus_indices(data, k, rng)?;
    Ok(indices.into_iter().map(|i| data.point(i)).collect())
}

/// Same as [`kmeans_plusplus`] but returns the dataset indices of the chosen
/// points, in selection order.
pub fn kmeans_plusplus_indices<R>(data: &Dataset, k: usize, rng: &mut R) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    data.check_k(k)?;

    let x = data.matrix();
    let n = data.len();

    let mut chosen = Vec::with_capacity(k);
    chosen.push(rng.random_range(0..n));

    // Squared distance from each point to its nearest chosen center.
    let mut min_d2 = vec![Float::INFINITY; n];

    while chosen.len() < k {
        let newest = x.row(chosen[chosen.len() - 1]).into_owned();

        let update = |(i, slot): (usize, &mut Float)| {
            let d2 = squared_euclidean(&x.row(i), &newest);
            if d2 < *slot {
                *slot = d2;
            }
        };

        #[cfg(feature = "parallel")]
        min_d2.par_iter_mut().enumerate().for_each(update);

        #[cfg(not(feature = "parallel"))]
        min_d2.iter_mut().enumerate().for_each(update);

        // Sequential sum keeps the sample reproducible for a fixed seed.
        let total: Float = min_d2.iter().sum();

        let next = if total > 0.0 {
            sample_weighted(&min_d2, total, rng)
        } else {
            debug!(
                step = chosen.len(),
                "all points coincide with chosen centers, sampling uniformly"
            );
            rng.random_range(0..n)
        };

        chosen.push(next);
    }

    debug!(k, n, d = data.dim(), ?chosen, "k-means++ seeding complete");
    Ok(chosen)
}

/// Draws an index with probability `weights[i] / total`.
///
/// Zero weights are never returned. `total` must be positive and equal to the
/// sum of `weights`; if rounding leaves the threshold unspent, the last index
/// with positive weight is returned.
fn sample_weighted<R>(weights: &[Float], total: Float, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut threshold = rng.random::<Float>() * total;
    let mut last_positive = 0;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if threshold < w {
            return i;
        }
        threshold -= w;
        last_positive = i;
    }

    last_positive
}

//! Seed-and-refine pipeline with independent restarts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use kplusplus_core::{CenterSet, ClusterError, Dataset, Float, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fit_result::FitResult;
use crate::refine::{check_centers, check_tolerance, refine};
use crate::seeding::kmeans_plusplus;
use crate::strategy::RefinementStrategy;

/// Settings for [`fit`].
///
/// # Fields
///
/// - `k`: Number of clusters
/// - `max_iter`: Maximum refinement iterations per run
/// - `tol`: Largest per-coordinate center movement still counted as converged
/// - `n_init`: Independent seed+refine runs; the lowest-dispersion run wins
/// - `seed`: Base seed; run `r` uses `seed + r`. `None` draws a fresh base seed
/// - `strategy`: Mean (Lloyd) or coordinate-wise median refinement
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub k: usize,
    pub max_iter: usize,
    pub tol: Float,
    pub n_init: usize,
    pub seed: Option<u64>,
    pub strategy: RefinementStrategy,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            k: 2,
            max_iter: 300,
            tol: 1e-9,
            n_init: 1,
            seed: None,
            strategy: RefinementStrategy::Mean,
        }
    }
}

impl FitOptions {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: Float) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: RefinementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn validate(&self, data: &Dataset) -> Result<()> {
        data.check_k(self.k)?;
        check_tolerance(self.tol)?;
        if self.n_init == 0 {
            return Err(ClusterError::InvalidHyperparameter {
                name: "n_init".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }
}

/// Clusters `data` with K-Means++ seeding followed by refinement.
///
/// Runs `options.n_init` independent pipelines, each with its own
/// [`StdRng`] seeded from `options.seed + run`, and keeps the one with the lowest
/// dispersion (ties go to the earliest run). Runs execute concurrently with the
/// `parallel` feature; the outcome does not depend on scheduling.
///
/// # Errors
///
/// - [`ClusterError::InvalidK`] if `k == 0` or `k > n`
/// - [`ClusterError::InvalidHyperparameter`] if `n_init == 0` or `tol` is invalid
///
/// All checks happen before any computation.
pub fn fit(data: &Dataset, options: &FitOptions) -> Result<FitResult> {
    options.validate(data)?;

    let base_seed = options.seed.unwrap_or_else(|| rand::rng().random());
    debug!(
        k = options.k,
        n = data.len(),
        d = data.dim(),
        n_init = options.n_init,
        base_seed,
        strategy = ?options.strategy,
        "starting fit"
    );

    let run = |r: usize| -> Result<FitResult> {
        let seed = base_seed.wrapping_add(r as u64);
        let mut rng = StdRng::seed_from_u64(seed);
        let centers = kmeans_plusplus(data, options.k, &mut rng)?;
        let result = refine(data, centers, options.strategy, options.max_iter, options.tol)?;
        debug!(run = r, seed, dispersion = result.dispersion(), "run finished");
        Ok(result.with_seed(seed))
    };

    #[cfg(feature = "parallel")]
    let results: Vec<FitResult> = (0..options.n_init)
        .into_par_iter()
        .map(run)
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let results: Vec<FitResult> = (0..options.n_init).map(run).collect::<Result<_>>()?;

    let best = results
        .into_iter()
        .reduce(|best, next| {
            if next.dispersion() < best.dispersion() {
                next
            } else {
                best
            }
        })
        .ok_or_else(|| ClusterError::InvalidHyperparameter {
            name: "n_init".into(),
            value: "0".into(),
        })?;

    debug!(
        seed = ?best.seed(),
        dispersion = best.dispersion(),
        converged = best.converged(),
        "fit complete"
    );
    Ok(best)
}

/// Refines caller-supplied centers, skipping seeding. `options.k`, `n_init` and
/// `seed` are ignored; the number of clusters is `centers.len()`.
///
/// # Errors
///
/// - [`ClusterError::EmptyCenterSet`] if `centers` is empty
/// - [`ClusterError::InvalidK`] if there are more centers than points
/// - [`ClusterError::ShapeMismatch`] on a dimensionality mismatch
/// - [`ClusterError::DimensionMismatch`] if the centers are ragged
/// - [`ClusterError::NonFiniteValue`] if a center is not finite
/// - [`ClusterError::InvalidHyperparameter`] if `tol` is invalid
pub fn fit_from_centers(
    data: &Dataset,
    centers: CenterSet,
    options: &FitOptions,
) -> Result<FitResult> {
    check_centers(data, &centers)?;
    refine(data, centers, options.strategy, options.max_iter, options.tol)
}

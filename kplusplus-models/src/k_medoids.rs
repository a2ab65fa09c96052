#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use kplusplus_core::{Assignment, CenterSet, ClusterError, Dataset, Float, Point, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::assignment::cluster_members;
use crate::fit::{fit, FitOptions};
use crate::fit_result::FitResult;
use crate::strategy::RefinementStrategy;

/// **K-Medoids clustering** with coordinate-wise median representatives.
///
/// Shares K-Means++ seeding and the Euclidean assignment step with
/// [`KMeans`](crate::k_means::KMeans), but:
/// - recomputes each representative as the **coordinate-wise median** of its
///   cluster instead of the mean
/// - reports dispersion as the **sum of absolute deviations** (L1) from the
///   representative instead of squared distances
///
/// A single far outlier cannot drag a median the way it drags a mean, so this
/// variant is more **robust to outliers** than K-Means.
///
/// # Algorithm
///
/// 1. Initialize `k` representatives with K-Means++
/// 2. Repeat until convergence or max iterations:
///    - **Assignment step**: assign each point to the closest representative
///    - **Update step**: recompute representatives as coordinate-wise medians
/// 3. Keep the best of `n_init` independent runs (lowest L1 dispersion)
///
/// # Errors
///
/// - [`ClusterError::InvalidK`] if `k == 0` or `k > n_samples`
/// - [`ClusterError::InvalidHyperparameter`] for a bad `tol` or `n_init`
/// - [`ClusterError::NotFitted`] if prediction called before fitting
///
/// # Notes
///
/// - Representatives are medians per coordinate, not necessarily data points
/// - Each update sorts every coordinate of every cluster, so iterations cost more
///   than K-Means iterations
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct KMedoids {
    options: FitOptions,
    result: Option<FitResult>,
}

impl Default for KMedoids {
    fn default() -> Self {
        Self::new(2, 300)
    }
}

impl KMedoids {
    /// Creates a new, unfitted K-Medoids model.
    ///
    /// # Parameters
    ///
    /// - `k`: Number of clusters (must be > 0)
    /// - `max_iter`: Maximum iterations for the algorithm
    ///
    /// # Example
    ///
    /// ```ignore
    /// let kmedoids = KMedoids::new(3, 100).with_seed(42);
    /// ```
    pub fn new(k: usize, max_iter: usize) -> Self {
        Self {
            options: FitOptions::new(k)
                .with_max_iter(max_iter)
                .with_strategy(RefinementStrategy::Medoid),
            result: None,
        }
    }

    /// Seeds the random source for reproducible fits.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    /// Number of independent K-Means++ restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.options.n_init = n_init;
        self
    }

    /// Largest per-coordinate center movement still counted as converged.
    pub fn with_tol(mut self, tol: Float) -> Self {
        self.options.tol = tol;
        self
    }

    /// Fits the model on `data` and returns the winning run.
    ///
    /// # Complexity
    ///
    /// Let `n = n_samples`, `d = n_features`, `t = iterations until convergence`.
    /// - Time: `O(n_init * t * (k * n * d + n * d * log n))`
    /// - Space: `O(k * d + n)` per run
    pub fn fit(&mut self, data: &Dataset) -> Result<&FitResult> {
        let result = fit(data, &self.options)?;
        Ok(&*self.result.insert(result))
    }

    /// Predicts cluster assignments for `data`.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::NotFitted`] if model not fitted
    /// - [`ClusterError::ShapeMismatch`] if `data.dim()` doesn't match training data
    pub fn predict(&self, data: &Dataset) -> Result<Assignment> {
        self.result
            .as_ref()
            .ok_or(ClusterError::NotFitted)?
            .predict(data)
    }

    /// Returns the learned representatives, or `None` if not fitted.
    pub fn medoids(&self) -> Option<&CenterSet> {
        self.result.as_ref().map(FitResult::centers)
    }

    /// Returns the full outcome of the last fit.
    pub fn result(&self) -> Option<&FitResult> {
        self.result.as_ref()
    }

    /// Returns the number of clusters.
    pub fn k(&self) -> usize {
        self.options.k
    }
}

/// Median of `values`; the mean of the two middle values for even lengths.
///
/// Sorts `values` in place. Returns `0.0` for an empty slice.
pub fn coordinate_median(values: &mut [Float]) -> Float {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Median update step: each representative becomes the coordinate-wise median of
/// its points.
///
/// If a cluster has no assigned points, its representative from `previous` is kept.
///
/// # Panics
///
/// If any label in `assignment` is `>= previous.len()`.
pub fn update_medians(data: &Dataset, assignment: &[usize], previous: &CenterSet) -> CenterSet {
    let x = data.matrix();
    let d = data.dim();
    let members = cluster_members(assignment, previous.len());

    let median = |(c, indices): (usize, &Vec<usize>)| -> Point {
        if indices.is_empty() {
            return previous[c].clone();
        }

        let mut values = Vec::with_capacity(indices.len());
        Point::from_fn(d, |_, j| {
            values.clear();
            values.extend(indices.iter().map(|&i| x[(i, j)]));
            coordinate_median(&mut values)
        })
    };

    #[cfg(feature = "parallel")]
    let medians: Vec<Point> = members.par_iter().enumerate().map(median).collect();

    #[cfg(not(feature = "parallel"))]
    let medians: Vec<Point> = members.iter().enumerate().map(median).collect();

    medians.into()
}

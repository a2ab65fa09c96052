#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use kplusplus_core::{Assignment, CenterSet, ClusterError, Dataset, Float, Point, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::assignment::cluster_members;
use crate::fit::{fit, FitOptions};
use crate::fit_result::FitResult;
use crate::strategy::RefinementStrategy;

/// **K-Means clustering** with K-Means++ seeding and Lloyd refinement.
///
/// K-Means is an **unsupervised learning** algorithm that partitions `n` samples
/// into `k` clusters by iteratively:
/// 1. Assigning each sample to the nearest centroid
/// 2. Updating centroids as the mean of assigned samples
///
/// # Algorithm
///
/// **Lloyd's algorithm** (standard K-Means):
/// 1. Initialize `k` centroids with K-Means++
/// 2. Repeat until convergence or max iterations:
///    - **Assignment step**: assign each point to closest centroid
///    - **Update step**: recompute centroids as mean of assigned points
/// 3. Keep the best of `n_init` independent runs
///
/// # Convergence
///
/// The algorithm stops when:
/// - No centroid coordinate moves by more than `tol`, OR
/// - Maximum iterations reached (reported, not an error)
///
/// # Distance metric
///
/// Points are assigned by Euclidean distance. The reported dispersion is the
/// within-cluster sum of squared distances.
///
/// # Errors
///
/// - [`ClusterError::InvalidK`] if `k == 0` or `k > n_samples`
/// - [`ClusterError::InvalidHyperparameter`] for a bad `tol` or `n_init`
/// - [`ClusterError::NotFitted`] if prediction called before fitting
///
/// # Notes
///
/// - K-Means assumes **spherical clusters** of similar size
/// - Sensitive to initialization; raise `n_init` to keep the best of several runs
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct KMeans {
    options: FitOptions,
    result: Option<FitResult>,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(2, 300)
    }
}

impl KMeans {
    /// Creates a new, unfitted K-Means model.
    ///
    /// # Parameters
    ///
    /// - `k`: Number of clusters (must be > 0)
    /// - `max_iter`: Maximum iterations for Lloyd's algorithm
    ///
    /// # Example
    ///
    /// ```ignore
    /// let kmeans = KMeans::new(3, 100).with_seed(42);
    /// ```
    pub fn new(k: usize, max_iter: usize) -> Self {
        Self {
            options: FitOptions::new(k)
                .with_max_iter(max_iter)
                .with_strategy(RefinementStrategy::Mean),
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
    /// - Time: `O(n_init * t * k * n * d)`
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

    /// Returns the learned cluster centroids, or `None` if not fitted.
    pub fn centroids(&self) -> Option<&CenterSet> {
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

/// Lloyd update step: each center becomes the arithmetic mean of its points.
///
/// If a cluster has no assigned points, its center from `previous` is kept.
///
/// # Panics
///
/// If any label in `assignment` is `>= previous.len()`.
pub fn update_means(data: &Dataset, assignment: &[usize], previous: &CenterSet) -> CenterSet {
    let x = data.matrix();
    let d = data.dim();
    let members = cluster_members(assignment, previous.len());

    let mean = |(c, indices): (usize, &Vec<usize>)| -> Point {
        if indices.is_empty() {
            return previous[c].clone();
        }

        let mut sum = Point::zeros(d);
        for &i in indices {
            for j in 0..d {
                sum[j] += x[(i, j)];
            }
        }
        sum / indices.len() as Float
    };

    #[cfg(feature = "parallel")]
    let centers: Vec<Point> = members.par_iter().enumerate().map(mean).collect();

    #[cfg(not(feature = "parallel"))]
    let centers: Vec<Point> = members.iter().enumerate().map(mean).collect();

    centers.into()
}

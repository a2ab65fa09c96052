#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use kplusplus_core::{Assignment, CenterSet, ClusterError, Dataset, Float, Result};

use crate::assignment::{assign_clusters, cluster_members};
use crate::strategy::RefinementStrategy;

/// How a refinement run stopped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// An update moved no center coordinate by more than the tolerance.
    Converged,
    /// `max_iter` updates ran without converging. The result is still usable.
    IterationLimitReached,
}

/// Outcome of one clustering fit.
///
/// Holds the final representatives, the label of every point, and the within-cluster
/// dispersion: sum of squared Euclidean distances for
/// [`RefinementStrategy::Mean`], sum of absolute (L1) deviations for
/// [`RefinementStrategy::Medoid`]. The assignment and dispersion are always
/// computed against the final centers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    centers: CenterSet,
    assignment: Assignment,
    dispersion: Float,
    termination: Termination,
    n_iter: usize,
    dispersion_history: Vec<Float>,
    strategy: RefinementStrategy,
    seed: Option<u64>,
}

impl FitResult {
    pub(crate) fn new(
        centers: CenterSet,
        assignment: Assignment,
        dispersion: Float,
        termination: Termination,
        n_iter: usize,
        dispersion_history: Vec<Float>,
        strategy: RefinementStrategy,
    ) -> Self {
        Self {
            centers,
            assignment,
            dispersion,
            termination,
            n_iter,
            dispersion_history,
            strategy,
            seed: None,
        }
    }

    pub(crate) fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Final cluster representatives (means or coordinate-wise medians).
    pub fn centers(&self) -> &CenterSet {
        &self.centers
    }

    /// Cluster label of every point of the fitted dataset.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centers.len()
    }

    pub fn dispersion(&self) -> Float {
        self.dispersion
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Number of update steps that ran.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Dispersion measured at the start of every iteration, before its update step.
    pub fn dispersion_history(&self) -> &[Float] {
        &self.dispersion_history
    }

    pub fn strategy(&self) -> RefinementStrategy {
        self.strategy
    }

    /// Seed of the random source used for K-Means++, `None` when the fit started
    /// from caller-supplied centers.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of points in each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k()];
        for &c in &self.assignment {
            sizes[c] += 1;
        }
        sizes
    }

    /// Indices of the points assigned to cluster `c`, in dataset order.
    pub fn cluster_members(&self, c: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter_map(|(i, &label)| (label == c).then_some(i))
            .collect()
    }

    /// Indices of all clusters' points, one bucket per cluster.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        cluster_members(&self.assignment, self.k())
    }

    /// Assigns new points to the nearest final center.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::ShapeMismatch`] if `data.dim()` differs from the centers'
    pub fn predict(&self, data: &Dataset) -> Result<Assignment> {
        if data.dim() != self.centers.dim() {
            return Err(ClusterError::ShapeMismatch {
                expected: self.centers.dim(),
                got: data.dim(),
            });
        }

        assign_clusters(data, &self.centers).map(|(labels, _)| labels)
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use kplusplus_core::{manhattan, squared_euclidean, CenterSet, Dataset, Float};

use crate::k_means::update_means;
use crate::k_medoids::update_medians;

/// How cluster representatives are recomputed once points are assigned.
///
/// Both strategies share the assignment step (nearest center by Euclidean
/// distance) and differ only in the update and in how dispersion is measured.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefinementStrategy {
    /// Lloyd update: arithmetic mean per cluster. Dispersion is the within-cluster
    /// sum of squared Euclidean distances.
    #[default]
    Mean,
    /// Coordinate-wise median per cluster. Dispersion is the within-cluster sum of
    /// absolute deviations, which keeps far outliers from dragging representatives.
    Medoid,
}

impl RefinementStrategy {
    /// Computes the next center set from the current assignment. Empty clusters keep
    /// their center from `previous`.
    ///
    /// # Panics
    ///
    /// If any label in `assignment` is `>= previous.len()`.
    pub fn update(&self, data: &Dataset, assignment: &[usize], previous: &CenterSet) -> CenterSet {
        match self {
            Self::Mean => update_means(data, assignment, previous),
            Self::Medoid => update_medians(data, assignment, previous),
        }
    }

    /// Total dispersion of `data` around the centers each point is assigned to.
    ///
    /// # Panics
    ///
    /// If any label in `assignment` is `>= centers.len()`.
    pub fn dispersion(&self, data: &Dataset, assignment: &[usize], centers: &CenterSet) -> Float {
        let x = data.matrix();
        assignment
            .iter()
            .enumerate()
            .map(|(i, &c)| match self {
                Self::Mean => squared_euclidean(&x.row(i), &centers[c]),
                Self::Medoid => manhattan(&x.row(i), &centers[c]),
            })
            .sum()
    }
}

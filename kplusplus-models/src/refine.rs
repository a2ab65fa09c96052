use kplusplus_core::{CenterSet, ClusterError, Dataset, Float, Result};
use tracing::{debug, trace};

use crate::assignment::assign_clusters;
use crate::fit_result::{FitResult, Termination};
use crate::strategy::RefinementStrategy;

/// Refines `initial` centers by alternating assignment and update steps.
///
/// # Algorithm
///
/// Repeat at most `max_iter` times:
/// - **Assignment step**: assign each point to its nearest center (ties to the
///   lowest index)
/// - **Update step**: recompute every center with `strategy`; empty clusters keep
///   their previous center
/// - Stop as **converged** once no center coordinate moved by more than `tol`
///
/// Running out of iterations is not an error: the result reports
/// [`Termination::IterationLimitReached`]. The returned assignment and dispersion
/// are computed against the final centers.
///
/// # Errors
///
/// - [`ClusterError::EmptyCenterSet`] if `initial` is empty
/// - [`ClusterError::InvalidK`] if `initial` holds more centers than `data` has points
/// - [`ClusterError::ShapeMismatch`] if center and point dimensionality differ
/// - [`ClusterError::DimensionMismatch`] if the centers are ragged
/// - [`ClusterError::NonFiniteValue`] if a center has a NaN or infinite coordinate
/// - [`ClusterError::InvalidHyperparameter`] if `tol` is negative or NaN
///
/// # Complexity
///
/// Let `t` be the iterations run. Mean updates cost `O(t * k * n * d)`; median
/// updates add a sort per coordinate, `O(t * n * d * log n)`.
pub fn refine(
    data: &Dataset,
    initial: CenterSet,
    strategy: RefinementStrategy,
    max_iter: usize,
    tol: Float,
) -> Result<FitResult> {
    check_centers(data, &initial)?;
    check_tolerance(tol)?;

    let mut centers = initial;
    let mut history = Vec::new();
    let mut termination = Termination::IterationLimitReached;
    let mut n_iter = 0;

    for iter in 0..max_iter {
        // Assignment step
        let (assignment, _) = assign_clusters(data, &centers)?;
        let dispersion = strategy.dispersion(data, &assignment, &centers);
        history.push(dispersion);

        // Update step
        let updated = strategy.update(data, &assignment, &centers);
        let shift = centers.max_abs_difference(&updated);
        centers = updated;
        n_iter += 1;

        trace!(iter, dispersion, shift, "refinement iteration");

        if shift <= tol {
            termination = Termination::Converged;
            break;
        }
    }

    let (assignment, _) = assign_clusters(data, &centers)?;
    let dispersion = strategy.dispersion(data, &assignment, &centers);

    debug!(
        ?strategy,
        k = centers.len(),
        n_iter,
        dispersion,
        ?termination,
        "refinement finished"
    );

    Ok(FitResult::new(
        centers,
        assignment,
        dispersion,
        termination,
        n_iter,
        history,
        strategy,
    ))
}

/// Validates caller-supplied centers against the dataset.
pub(crate) fn check_centers(data: &Dataset, centers: &CenterSet) -> Result<()> {
    if centers.is_empty() {
        return Err(ClusterError::EmptyCenterSet);
    }
    data.check_k(centers.len())?;
    if centers.dim() != data.dim() {
        return Err(ClusterError::ShapeMismatch {
            expected: data.dim(),
            got: centers.dim(),
        });
    }
    for (index, center) in centers.iter().enumerate() {
        if center.len() != data.dim() {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected: data.dim(),
                got: center.len(),
            });
        }
        if let Some(dim) = center.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::NonFiniteValue { index, dim });
        }
    }
    Ok(())
}

pub(crate) fn check_tolerance(tol: Float) -> Result<()> {
    if tol.is_nan() || tol < 0.0 {
        return Err(ClusterError::InvalidHyperparameter {
            name: "tol".into(),
            value: tol.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kplusplus_core::Point;

    const TOL: Float = 1e-9;

    fn four_points() -> Dataset {
        Dataset::from_rows(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]).unwrap()
    }

    fn blobs() -> Dataset {
        let mut rows = Vec::new();
        for (cx, cy) in [(0.0, 0.0), (6.0, 1.0), (2.0, 8.0)] {
            for i in 0..10 {
                let t = i as Float;
                rows.push(vec![cx + (t * 0.37).sin(), cy + (t * 0.53).cos()]);
            }
        }
        Dataset::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_refine_four_points_mean() {
        let data = four_points();
        let initial = CenterSet::from_rows(&[[0.0, 0.0], [10.0, 1.0]]).unwrap();

        let result = refine(&data, initial, RefinementStrategy::Mean, 100, TOL).unwrap();

        assert!(result.converged());
        assert_eq!(result.assignment(), &vec![0, 0, 1, 1]);
        assert_eq!(result.centers()[0][0], 0.0);
        assert_eq!(result.centers()[0][1], 0.5);
        assert_eq!(result.centers()[1][0], 10.0);
        assert_eq!(result.centers()[1][1], 0.5);
        assert!((result.dispersion() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_refine_lloyd_dispersion_non_increasing() {
        let data = blobs();
        // Deliberately poor start: three points from the same blob.
        let initial = CenterSet::from_iter([data.point(0), data.point(1), data.point(2)]);

        let result = refine(&data, initial, RefinementStrategy::Mean, 100, TOL).unwrap();
        let history = result.dispersion_history();
        assert!(history.len() >= 2);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "dispersion increased: {history:?}");
        }
        assert!(result.dispersion() <= history[history.len() - 1] + 1e-9);
    }

    #[test]
    fn test_refine_is_idempotent_at_fixed_point() {
        let data = blobs();
        let initial = CenterSet::from_iter([data.point(0), data.point(10), data.point(20)]);

        for strategy in [RefinementStrategy::Mean, RefinementStrategy::Medoid] {
            let first = refine(&data, initial.clone(), strategy, 100, TOL).unwrap();
            assert!(first.converged());

            let second = refine(&data, first.centers().clone(), strategy, 100, TOL).unwrap();
            assert!(second.converged());
            assert_eq!(second.n_iter(), 1);
            assert_eq!(second.centers(), first.centers());
            assert_eq!(second.assignment(), first.assignment());
            assert_eq!(second.dispersion(), first.dispersion());
        }
    }

    #[test]
    fn test_refine_iteration_limit() {
        let data = blobs();
        let initial = CenterSet::from_iter([data.point(0), data.point(1), data.point(2)]);

        let result = refine(&data, initial, RefinementStrategy::Mean, 1, TOL).unwrap();
        assert_eq!(result.termination(), Termination::IterationLimitReached);
        assert!(!result.converged());
        assert_eq!(result.n_iter(), 1);
        assert_eq!(result.assignment().len(), data.len());
    }

    #[test]
    fn test_refine_zero_iterations_keeps_initial_centers() {
        let data = four_points();
        let initial = CenterSet::from_rows(&[[0.0, 0.0], [10.0, 1.0]]).unwrap();

        let result = refine(&data, initial.clone(), RefinementStrategy::Mean, 0, TOL).unwrap();
        assert_eq!(result.centers(), &initial);
        assert_eq!(result.n_iter(), 0);
        assert!(result.dispersion_history().is_empty());
        assert!(!result.converged());
    }

    #[test]
    fn test_refine_empty_cluster_keeps_center() {
        let data = Dataset::from_rows(&[[0.0], [1.0], [2.0]]).unwrap();
        // The second center is never nearest to any point.
        let initial = CenterSet::from_rows(&[[1.0], [100.0]]).unwrap();

        let result = refine(&data, initial, RefinementStrategy::Mean, 10, TOL).unwrap();
        assert_eq!(result.centers()[1][0], 100.0);
        assert_eq!(result.cluster_sizes(), vec![3, 0]);
        assert_eq!(result.centers()[0][0], 1.0);
    }

    #[test]
    fn test_refine_k_equals_n_has_zero_dispersion() {
        let data = four_points();
        let initial = CenterSet::from_iter((0..4).map(|i| data.point(i)));

        for strategy in [RefinementStrategy::Mean, RefinementStrategy::Medoid] {
            let result = refine(&data, initial.clone(), strategy, 10, TOL).unwrap();
            assert_eq!(result.dispersion(), 0.0);
            assert_eq!(result.assignment(), &vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_refine_rejects_bad_centers() {
        let data = four_points();

        let result = refine(&data, CenterSet::new(), RefinementStrategy::Mean, 10, TOL);
        assert!(matches!(result, Err(ClusterError::EmptyCenterSet)));

        let wrong_dim = CenterSet::from_rows(&[[0.0], [1.0]]).unwrap();
        let result = refine(&data, wrong_dim, RefinementStrategy::Mean, 10, TOL);
        assert!(matches!(
            result,
            Err(ClusterError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        ));

        let too_many = CenterSet::from_iter((0..4).chain(0..1).map(|i| data.point(i)));
        let result = refine(&data, too_many, RefinementStrategy::Mean, 10, TOL);
        assert!(matches!(result, Err(ClusterError::InvalidK { k: 5, n: 4 })));
    }

    #[test]
    fn test_refine_rejects_ragged_centers() {
        let data = four_points();
        let ragged = CenterSet::from(vec![
            Point::from_row_slice(&[0.0, 0.0]),
            Point::from_row_slice(&[10.0]),
        ]);

        let result = refine(&data, ragged, RefinementStrategy::Mean, 10, TOL);
        assert!(matches!(
            result,
            Err(ClusterError::DimensionMismatch {
                index: 1,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_refine_rejects_non_finite_centers() {
        let data = four_points();
        for bad in [Float::NAN, Float::INFINITY] {
            let centers = CenterSet::from(vec![
                Point::from_row_slice(&[0.0, 0.0]),
                Point::from_row_slice(&[10.0, bad]),
            ]);
            for strategy in [RefinementStrategy::Mean, RefinementStrategy::Medoid] {
                let result = refine(&data, centers.clone(), strategy, 10, TOL);
                assert!(matches!(
                    result,
                    Err(ClusterError::NonFiniteValue { index: 1, dim: 1 })
                ));
            }
        }
    }

    #[test]
    fn test_refine_rejects_bad_tolerance() {
        let data = four_points();
        let initial = CenterSet::from_rows(&[[0.0, 0.0]]).unwrap();
        for tol in [-1.0, Float::NAN] {
            let result = refine(&data, initial.clone(), RefinementStrategy::Mean, 10, tol);
            assert!(matches!(
                result,
                Err(ClusterError::InvalidHyperparameter { .. })
            ));
        }
    }
}

use kplusplus_core::{nearest_center, Assignment, CenterSet, Dataset, Float, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Assigns every point to its nearest center (squared Euclidean, ties to the
/// lowest center index).
///
/// # Returns
///
/// The cluster label of each point together with its squared distance to the
/// assigned center.
///
/// # Errors
///
/// - [`ClusterError::EmptyCenterSet`](kplusplus_core::ClusterError::EmptyCenterSet) if `centers` is empty
pub fn assign_clusters(data: &Dataset, centers: &CenterSet) -> Result<(Assignment, Vec<Float>)> {
    let x = data.matrix();
    let nearest = |i: usize| nearest_center(&x.row(i), centers);

    #[cfg(feature = "parallel")]
    let pairs: Vec<(usize, Float)> = (0..data.len())
        .into_par_iter()
        .map(nearest)
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let pairs: Vec<(usize, Float)> = (0..data.len()).map(nearest).collect::<Result<_>>()?;

    Ok(pairs.into_iter().unzip())
}

/// Groups point indices by cluster label. Clusters with no points get an empty
/// bucket.
///
/// # Panics
///
/// If any label in `assignment` is `>= k`.
pub fn cluster_members(assignment: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); k];
    for (i, &c) in assignment.iter().enumerate() {
        members[c].push(i);
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use kplusplus_core::ClusterError;

    #[test]
    fn test_assign_nearest() {
        let data = Dataset::from_rows(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]).unwrap();
        let centers = CenterSet::from_rows(&[[10.0, 0.5], [0.0, 0.5]]).unwrap();

        let (labels, d2) = assign_clusters(&data, &centers).unwrap();
        assert_eq!(labels, vec![1, 1, 0, 0]);
        assert!(d2.iter().all(|&v| (v - 0.25).abs() < 1e-12));
    }

    #[test]
    fn test_assign_is_total() {
        let rows: Vec<Vec<Float>> = (0..25).map(|i| vec![i as Float, (i * i) as Float]).collect();
        let data = Dataset::from_rows(&rows).unwrap();
        let centers = CenterSet::from_rows(&[[0.0, 0.0], [12.0, 144.0], [24.0, 576.0]]).unwrap();

        let (labels, d2) = assign_clusters(&data, &centers).unwrap();
        assert_eq!(labels.len(), data.len());
        assert_eq!(d2.len(), data.len());
        assert!(labels.iter().all(|&c| c < centers.len()));
    }

    #[test]
    fn test_assign_ties_to_lowest_index() {
        let data = Dataset::from_rows(&[[0.0]]).unwrap();
        let centers = CenterSet::from_rows(&[[1.0], [-1.0]]).unwrap();
        let (labels, _) = assign_clusters(&data, &centers).unwrap();
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn test_assign_empty_centers() {
        let data = Dataset::from_rows(&[[0.0]]).unwrap();
        let result = assign_clusters(&data, &CenterSet::new());
        assert!(matches!(result, Err(ClusterError::EmptyCenterSet)));
    }

    #[test]
    fn test_cluster_members() {
        let members = cluster_members(&[2, 0, 2, 2], 3);
        assert_eq!(members, vec![vec![1], vec![], vec![0, 2, 3]]);
    }

    #[test]
    #[should_panic]
    fn test_cluster_members_label_out_of_range() {
        cluster_members(&[0, 3], 2);
    }
}

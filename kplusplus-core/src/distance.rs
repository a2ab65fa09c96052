//! Point-to-point and point-to-center-set distances.
//!
//! Every function accepts anything that iterates over `&Float`: slices, owned
//! [`Point`](crate::Point)s, or borrowed matrix rows such as `&data.matrix().row(i)`.
//! Mismatched lengths are not checked here; callers validate dimensionality once
//! per fit.

use crate::{CenterSet, ClusterError, Float, Result};

/// Squared Euclidean distance `Σ (a_i − b_i)²`.
///
/// Ranks points identically to [`euclidean`] without the `sqrt`, so assignment and
/// seeding work with it directly.
pub fn squared_euclidean<'a, 'b, A, B>(a: A, b: B) -> Float
where
    A: IntoIterator<Item = &'a Float>,
    B: IntoIterator<Item = &'b Float>,
{
    a.into_iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Euclidean distance `√Σ (a_i − b_i)²`.
pub fn euclidean<'a, 'b, A, B>(a: A, b: B) -> Float
where
    A: IntoIterator<Item = &'a Float>,
    B: IntoIterator<Item = &'b Float>,
{
    squared_euclidean(a, b).sqrt()
}

/// Manhattan (L1) distance `Σ |a_i − b_i|`.
pub fn manhattan<'a, 'b, A, B>(a: A, b: B) -> Float
where
    A: IntoIterator<Item = &'a Float>,
    B: IntoIterator<Item = &'b Float>,
{
    a.into_iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Index and squared Euclidean distance of the center nearest to `x`.
///
/// Ties go to the lowest center index.
///
/// # Errors
///
/// - [`ClusterError::EmptyCenterSet`] if `centers` is empty
pub fn nearest_center<'a, P>(x: P, centers: &CenterSet) -> Result<(usize, Float)>
where
    P: IntoIterator<Item = &'a Float> + Copy,
{
    let mut best = None;

    for (c, center) in centers.iter().enumerate() {
        let d2 = squared_euclidean(x, center);
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((c, d2)),
        }
    }

    best.ok_or(ClusterError::EmptyCenterSet)
}

/// Euclidean distance from `x` to the nearest center.
///
/// A point that coincides with a center is at distance `0`.
///
/// # Errors
///
/// - [`ClusterError::EmptyCenterSet`] if `centers` is empty
pub fn closest_center_distance<'a, P>(x: P, centers: &CenterSet) -> Result<Float>
where
    P: IntoIterator<Item = &'a Float> + Copy,
{
    nearest_center(x, centers).map(|(_, d2)| d2.sqrt())
}

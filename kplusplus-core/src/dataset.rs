use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ClusterError, Float, Matrix, Point, Result};

/// A validated, read-only collection of `n` points sharing dimensionality `d`.
///
/// Points are stored as the rows of an `n × d` matrix. Every constructor checks
/// that the dataset is non-empty, that `d >= 1`, that all rows agree on `d`, and
/// that every coordinate is finite. Clustering code can therefore rely on these
/// invariants without re-checking them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Matrix,
}

impl Dataset {
    /// Wraps an `n × d` matrix whose rows are the points.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::EmptyDataset`] if the matrix has zero rows
    /// - [`ClusterError::ZeroDimensional`] if it has zero columns
    /// - [`ClusterError::NonFiniteValue`] on the first NaN or infinite coordinate
    pub fn from_matrix(points: Matrix) -> Result<Self> {
        if points.nrows() == 0 {
            return Err(ClusterError::EmptyDataset);
        }
        if points.ncols() == 0 {
            return Err(ClusterError::ZeroDimensional);
        }

        for i in 0..points.nrows() {
            for j in 0..points.ncols() {
                if !points[(i, j)].is_finite() {
                    return Err(ClusterError::NonFiniteValue { index: i, dim: j });
                }
            }
        }

        Ok(Self { points })
    }

    /// Builds a dataset from a slice of coordinate rows.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::from_matrix`], plus [`ClusterError::DimensionMismatch`]
    /// for the first row whose length differs from the first row's.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let data = Dataset::from_rows(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0]])?;
    /// assert_eq!(data.len(), 3);
    /// ```
    pub fn from_rows<R: AsRef<[Float]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(ClusterError::EmptyDataset)?;
        let d = first.as_ref().len();
        if d == 0 {
            return Err(ClusterError::ZeroDimensional);
        }

        for (index, row) in rows.iter().enumerate() {
            let got = row.as_ref().len();
            if got != d {
                return Err(ClusterError::DimensionMismatch {
                    index,
                    expected: d,
                    got,
                });
            }
        }

        Self::from_matrix(Matrix::from_fn(rows.len(), d, |i, j| rows[i].as_ref()[j]))
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Dimensionality of every point.
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    /// The underlying `n × d` matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.points
    }

    /// Owned copy of point `i`.
    ///
    /// # Panics
    ///
    /// If `i >= self.len()`.
    pub fn point(&self, i: usize) -> Point {
        self.points.row(i).into_owned()
    }

    /// Checks that `k` clusters can be formed from this dataset.
    pub fn check_k(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.len() {
            return Err(ClusterError::InvalidK { k, n: self.len() });
        }
        Ok(())
    }
}

/// Ordered cluster representatives.
///
/// Seeding grows the set one point at a time, so insertion order is selection
/// order. Refinement replaces every entry at once by building a new set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CenterSet {
    centers: Vec<Point>,
}

impl CenterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(k: usize) -> Self {
        Self {
            centers: Vec::with_capacity(k),
        }
    }

    /// Builds a center set from coordinate rows.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::EmptyCenterSet`] if `rows` is empty
    /// - [`ClusterError::ZeroDimensional`] if the first row is empty
    /// - [`ClusterError::DimensionMismatch`] for ragged rows
    /// - [`ClusterError::NonFiniteValue`] for NaN or infinite coordinates
    pub fn from_rows<R: AsRef<[Float]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(ClusterError::EmptyCenterSet)?;
        let d = first.as_ref().len();
        if d == 0 {
            return Err(ClusterError::ZeroDimensional);
        }

        let mut centers = Self::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != d {
                return Err(ClusterError::DimensionMismatch {
                    index,
                    expected: d,
                    got: row.len(),
                });
            }
            if let Some(dim) = row.iter().position(|v| !v.is_finite()) {
                return Err(ClusterError::NonFiniteValue { index, dim });
            }
            centers.push(Point::from_fn(d, |_, j| row[j]));
        }

        Ok(centers)
    }

    pub fn push(&mut self, center: Point) {
        self.centers.push(center);
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Dimensionality of the centers, `0` when the set is empty.
    pub fn dim(&self) -> usize {
        self.centers.first().map_or(0, |c| c.len())
    }

    pub fn get(&self, c: usize) -> Option<&Point> {
        self.centers.get(c)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.centers.iter()
    }

    /// Copies the centers into a `k × d` matrix, one center per row.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_fn(self.len(), self.dim(), |i, j| self.centers[i][j])
    }

    /// Largest per-coordinate absolute difference between two center sets of the
    /// same shape. Sets of different shape are infinitely far apart.
    pub fn max_abs_difference(&self, other: &CenterSet) -> Float {
        if self.len() != other.len() || self.dim() != other.dim() {
            return Float::INFINITY;
        }

        self.centers
            .iter()
            .zip(other.centers.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()))
            .fold(0.0, |acc: Float, (x, y)| acc.max((x - y).abs()))
    }
}

impl Index<usize> for CenterSet {
    type Output = Point;

    fn index(&self, c: usize) -> &Point {
        &self.centers[c]
    }
}

impl FromIterator<Point> for CenterSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            centers: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Point>> for CenterSet {
    fn from(centers: Vec<Point>) -> Self {
        Self { centers }
    }
}

impl<'a> IntoIterator for &'a CenterSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.centers.iter()
    }
}

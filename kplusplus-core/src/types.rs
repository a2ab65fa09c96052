pub type Float = f64;
pub type Matrix = nalgebra::DMatrix<Float>;
/// An owned point: one row of coordinates.
pub type Point = nalgebra::RowDVector<Float>;
/// Cluster label per dataset index.
pub type Assignment = Vec<usize>;

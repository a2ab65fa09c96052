use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// Requested cluster count outside `[1, n]`.
    #[error("invalid cluster count k = {k}: must lie in [1, {n}]")]
    InvalidK { k: usize, n: usize },

    /// The dataset contains zero points.
    #[error("dataset contains no points")]
    EmptyDataset,

    /// A point's dimensionality differs from the first point of the same dataset.
    #[error("point {index} has {got} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Points carry no coordinates at all.
    #[error("points must have at least one coordinate")]
    ZeroDimensional,

    /// NaN or infinite coordinate.
    #[error("non-finite coordinate at point {index}, dimension {dim}")]
    NonFiniteValue { index: usize, dim: usize },

    /// Nearest-center query against an empty center set. Indicates a defect when it
    /// escapes a fit.
    #[error("center set is empty")]
    EmptyCenterSet,

    /// Centers or query points don't match the dimensionality they are used with.
    #[error("shape mismatch: expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Invalid hyperparameter value
    #[error("invalid hyperparameter `{name}`: {value}")]
    InvalidHyperparameter { name: String, value: String },

    /// Model used before calling `fit`
    #[error("model used before calling `fit`")]
    NotFitted,
}

pub type Result<T> = std::result::Result<T, ClusterError>;

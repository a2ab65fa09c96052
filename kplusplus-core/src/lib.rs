pub mod dataset;
pub mod distance;
pub mod error;
pub mod types;

pub use types::{Assignment, Float, Matrix, Point};

pub use dataset::{CenterSet, Dataset};
pub use error::{ClusterError, Result};

pub use distance::{closest_center_distance, euclidean, manhattan, nearest_center, squared_euclidean};

pub mod assignment;
pub mod fit;
pub mod fit_result;
pub mod k_means;
pub mod k_medoids;
pub mod refine;
pub mod seeding;
pub mod strategy;

pub use fit::{fit, fit_from_centers, FitOptions};
pub use fit_result::{FitResult, Termination};
pub use k_means::KMeans;
pub use k_medoids::KMedoids;
pub use refine::refine;
pub use seeding::{kmeans_plusplus, kmeans_plusplus_indices};
pub use strategy::RefinementStrategy;

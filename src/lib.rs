//! K-means++ seeding with Lloyd (mean) and coordinate-wise median refinement.
//!
//! Core types and distances live in [`kplusplus_core`]; seeding, refinement and
//! the model types live in [`kplusplus_models`]. Both are re-exported here.

pub use kplusplus_core::*;
pub use kplusplus_models::*;

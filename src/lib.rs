//! Field-interest prediction and program ranking for student recommendations.
//!
//! Both pipelines turn typed profiles into fixed-width feature vectors, score them
//! with a shared read-only classifier, and return results sorted by score.

pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod features;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod routes;
pub mod types;
pub mod vocab;

pub use engine::RecommendationEngine;
pub use error::AppError;

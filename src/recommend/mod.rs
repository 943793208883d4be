//! Baseline recommenders and the per-user recommendation task.

mod algorithm;
mod baseline;
mod registry;
mod task;

pub use algorithm::{RecommendationModel, RecommenderAlgorithm};
pub use baseline::{BiasBaseline, ItemMean, MeanRating, UserMean};
pub use registry::AlgorithmRegistry;
pub use task::{RecommendationExecutor, RecommendationRequest, UserRecommendations};

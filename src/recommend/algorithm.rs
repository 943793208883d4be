use crate::domain::{ItemId, RatingValue, RatingsDataset, UserId};
use crate::errors::EngineResult;

/// Trained model able to score (user, item) pairs
pub trait RecommendationModel: Send + Sync {
    /// `None` when the model has nothing to say about the pair
    fn predict(&self, dataset: &dyn RatingsDataset, user_id: UserId, item_id: ItemId) -> Option<RatingValue>;
}

/// Recommendation technique invoked by the experiment engine
pub trait RecommenderAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn build_model(&self, training: &dyn RatingsDataset) -> EngineResult<Box<dyn RecommendationModel>>;
}

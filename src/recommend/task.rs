use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::algorithm::RecommendationModel;
use crate::domain::{ItemId, Recommendation, RatingsDataset, UserId};
use crate::errors::EngineResult;
use crate::execution::SingleTaskExecutor;

/// Items to score for one user
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub user_id: UserId,
    pub candidates: Vec<ItemId>,
}

impl RecommendationRequest {
    pub fn new(user_id: UserId, candidates: Vec<ItemId>) -> Self {
        Self { user_id, candidates }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendations {
    pub user_id: UserId,
    /// Best prediction first
    pub recommendations: Vec<Recommendation>,
}

/// Scores the candidate items of one user per task.
///
/// A user missing from the training data gets an empty list. Candidates the
/// model cannot score are left out.
pub struct RecommendationExecutor<'a> {
    training: &'a dyn RatingsDataset,
    model: &'a dyn RecommendationModel,
}

impl<'a> RecommendationExecutor<'a> {
    pub fn new(training: &'a dyn RatingsDataset, model: &'a dyn RecommendationModel) -> Self {
        Self { training, model }
    }
}

impl SingleTaskExecutor for RecommendationExecutor<'_> {
    type Input = RecommendationRequest;
    type Output = UserRecommendations;

    fn execute(&self, request: RecommendationRequest) -> EngineResult<UserRecommendations> {
        let RecommendationRequest { user_id, candidates } = request;

        if self.training.user_ratings(user_id).is_err() {
            return Ok(UserRecommendations {
                user_id,
                recommendations: Vec::new(),
            });
        }

        let mut recommendations: Vec<Recommendation> = candidates
            .into_iter()
            .filter_map(|item_id| {
                self.model
                    .predict(self.training, user_id, item_id)
                    .filter(|prediction| prediction.is_finite())
                    .map(|prediction| Recommendation::new(item_id, prediction))
            })
            .collect();
        recommendations.sort_by(by_prediction_descending);

        Ok(UserRecommendations {
            user_id,
            recommendations,
        })
    }
}

fn by_prediction_descending(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.prediction
        .total_cmp(&a.prediction)
        .then(a.item_id.cmp(&b.item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating};
    use crate::recommend::{ItemMean, RecommenderAlgorithm};

    fn training() -> InMemoryDataset {
        InMemoryDataset::from_ratings(vec![
            Rating::new(1, 10, 2.0),
            Rating::new(2, 11, 5.0),
            Rating::new(2, 12, 3.0),
            Rating::new(3, 10, 4.0),
        ])
    }

    #[test]
    fn test_recommendations_sorted_by_prediction() {
        let data = training();
        let model = ItemMean.build_model(&data).unwrap();
        let executor = RecommendationExecutor::new(&data, model.as_ref());

        let output = executor
            .execute(RecommendationRequest::new(1, vec![10, 12, 11, 99]))
            .unwrap();

        let items: Vec<ItemId> = output.recommendations.iter().map(|r| r.item_id).collect();
        assert_eq!(items, vec![11, 10, 12]);
    }

    #[test]
    fn test_unknown_user_gets_empty_list() {
        let data = training();
        let model = ItemMean.build_model(&data).unwrap();
        let executor = RecommendationExecutor::new(&data, model.as_ref());

        let output = executor
            .execute(RecommendationRequest::new(42, vec![10, 11]))
            .unwrap();

        assert_eq!(output.user_id, 42);
        assert!(output.recommendations.is_empty());
    }
}

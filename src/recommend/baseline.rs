use std::collections::HashMap;

use super::algorithm::{RecommendationModel, RecommenderAlgorithm};
use crate::domain::{ItemId, RatingValue, RatingsDataset, UserId};
use crate::errors::{EngineError, EngineResult};

fn global_mean(training: &dyn RatingsDataset) -> EngineResult<RatingValue> {
    if training.num_ratings() == 0 {
        return Err(EngineError::ModelBuild("training dataset is empty".to_string()));
    }

    let mut sum = 0.0;
    for user_id in training.all_users() {
        sum += training.user_ratings(user_id)?.values().map(|r| r.value).sum::<f64>();
    }
    Ok(sum / training.num_ratings() as f64)
}

/// Predicts the global mean rating for everything
#[derive(Debug, Clone, Default)]
pub struct MeanRating;

struct ConstantModel {
    value: RatingValue,
}

impl RecommendationModel for ConstantModel {
    fn predict(&self, _dataset: &dyn RatingsDataset, _user_id: UserId, _item_id: ItemId) -> Option<RatingValue> {
        Some(self.value)
    }
}

impl RecommenderAlgorithm for MeanRating {
    fn name(&self) -> &'static str {
        "mean-rating"
    }

    fn description(&self) -> &'static str {
        "Global mean of the training ratings"
    }

    fn build_model(&self, training: &dyn RatingsDataset) -> EngineResult<Box<dyn RecommendationModel>> {
        Ok(Box::new(ConstantModel {
            value: global_mean(training)?,
        }))
    }
}

/// Predicts the user's mean rating
#[derive(Debug, Clone, Default)]
pub struct UserMean;

struct UserMeanModel {
    means: HashMap<UserId, RatingValue>,
}

impl RecommendationModel for UserMeanModel {
    fn predict(&self, _dataset: &dyn RatingsDataset, user_id: UserId, _item_id: ItemId) -> Option<RatingValue> {
        self.means.get(&user_id).copied()
    }
}

impl RecommenderAlgorithm for UserMean {
    fn name(&self) -> &'static str {
        "user-mean"
    }

    fn description(&self) -> &'static str {
        "Mean rating of the target user"
    }

    fn build_model(&self, training: &dyn RatingsDataset) -> EngineResult<Box<dyn RecommendationModel>> {
        let mut means = HashMap::new();
        for user_id in training.all_users() {
            means.insert(user_id, training.mean_user_rating(user_id)?);
        }
        Ok(Box::new(UserMeanModel { means }))
    }
}

/// Predicts the item's mean rating
#[derive(Debug, Clone, Default)]
pub struct ItemMean;

struct ItemMeanModel {
    means: HashMap<ItemId, RatingValue>,
}

impl RecommendationModel for ItemMeanModel {
    fn predict(&self, _dataset: &dyn RatingsDataset, _user_id: UserId, item_id: ItemId) -> Option<RatingValue> {
        self.means.get(&item_id).copied()
    }
}

impl RecommenderAlgorithm for ItemMean {
    fn name(&self) -> &'static str {
        "item-mean"
    }

    fn description(&self) -> &'static str {
        "Mean rating received by the target item"
    }

    fn build_model(&self, training: &dyn RatingsDataset) -> EngineResult<Box<dyn RecommendationModel>> {
        let mut means = HashMap::new();
        for item_id in training.all_rated_items() {
            means.insert(item_id, training.mean_item_rating(item_id)?);
        }
        Ok(Box::new(ItemMeanModel { means }))
    }
}

/// Global mean plus user and item offsets.
///
/// Item biases are averaged first, then user biases over the residuals.
#[derive(Debug, Clone, Default)]
pub struct BiasBaseline;

struct BiasModel {
    global: RatingValue,
    user_bias: HashMap<UserId, f64>,
    item_bias: HashMap<ItemId, f64>,
}

impl RecommendationModel for BiasModel {
    fn predict(&self, _dataset: &dyn RatingsDataset, user_id: UserId, item_id: ItemId) -> Option<RatingValue> {
        let user = self.user_bias.get(&user_id).copied().unwrap_or(0.0);
        let item = self.item_bias.get(&item_id).copied().unwrap_or(0.0);
        Some(self.global + user + item)
    }
}

impl RecommenderAlgorithm for BiasBaseline {
    fn name(&self) -> &'static str {
        "bias-baseline"
    }

    fn description(&self) -> &'static str {
        "Global mean corrected by user and item biases"
    }

    fn build_model(&self, training: &dyn RatingsDataset) -> EngineResult<Box<dyn RecommendationModel>> {
        let global = global_mean(training)?;

        let mut item_bias = HashMap::new();
        for item_id in training.all_rated_items() {
            let ratings = training.item_ratings(item_id)?;
            let offset = ratings.values().map(|r| r.value - global).sum::<f64>() / ratings.len() as f64;
            item_bias.insert(item_id, offset);
        }

        let mut user_bias = HashMap::new();
        for user_id in training.all_users() {
            let ratings = training.user_ratings(user_id)?;
            let residual: f64 = ratings
                .values()
                .map(|r| r.value - global - item_bias.get(&r.item_id).copied().unwrap_or(0.0))
                .sum();
            user_bias.insert(user_id, residual / ratings.len() as f64);
        }

        Ok(Box::new(BiasModel {
            global,
            user_bias,
            item_bias,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating};

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::from_ratings(vec![
            Rating::new(1, 10, 5.0),
            Rating::new(1, 11, 3.0),
            Rating::new(2, 10, 3.0),
            Rating::new(2, 12, 1.0),
        ])
    }

    #[test]
    fn test_mean_rating() {
        let data = dataset();
        let model = MeanRating.build_model(&data).unwrap();

        assert_eq!(model.predict(&data, 1, 99), Some(3.0));
    }

    #[test]
    fn test_user_and_item_means() {
        let data = dataset();
        let by_user = UserMean.build_model(&data).unwrap();
        let by_item = ItemMean.build_model(&data).unwrap();

        assert_eq!(by_user.predict(&data, 1, 12), Some(4.0));
        assert_eq!(by_user.predict(&data, 9, 12), None);
        assert_eq!(by_item.predict(&data, 9, 10), Some(4.0));
        assert_eq!(by_item.predict(&data, 1, 99), None);
    }

    #[test]
    fn test_bias_baseline_reproduces_offsets() {
        let data = dataset();
        let model = BiasBaseline.build_model(&data).unwrap();

        // global 3, item 10 bias +1, user 1 residuals (5-3-1, 3-3-0) average 0.5
        assert_eq!(model.predict(&data, 1, 10), Some(4.5));
        assert_eq!(model.predict(&data, 42, 42), Some(3.0));
    }

    #[test]
    fn test_empty_training_set_fails() {
        let empty = InMemoryDataset::new();

        assert!(matches!(
            MeanRating.build_model(&empty),
            Err(EngineError::ModelBuild(_))
        ));
    }
}

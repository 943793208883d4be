use std::collections::{BTreeMap, BTreeSet};

use super::models::{ItemId, Rating, RatingValue, UserId};
use crate::errors::{EngineError, EngineResult};

pub type UserRatings = BTreeMap<ItemId, Rating>;
pub type ItemRatings = BTreeMap<UserId, Rating>;

/// Read-only access to a ratings dataset.
///
/// Listing methods return ids in ascending order, so callers can rely on
/// a stable iteration order regardless of the storage behind the dataset.
pub trait RatingsDataset: Send + Sync {
    fn all_users(&self) -> Vec<UserId>;

    fn all_rated_items(&self) -> Vec<ItemId>;

    fn user_ratings(&self, user_id: UserId) -> EngineResult<&UserRatings>;

    fn item_ratings(&self, item_id: ItemId) -> EngineResult<&ItemRatings>;

    fn num_ratings(&self) -> usize;

    fn user_rated(&self, user_id: UserId) -> EngineResult<BTreeSet<ItemId>> {
        Ok(self.user_ratings(user_id)?.keys().copied().collect())
    }

    fn item_rated(&self, item_id: ItemId) -> EngineResult<BTreeSet<UserId>> {
        Ok(self.item_ratings(item_id)?.keys().copied().collect())
    }

    fn rating(&self, user_id: UserId, item_id: ItemId) -> Option<Rating> {
        self.user_ratings(user_id)
            .ok()
            .and_then(|ratings| ratings.get(&item_id).copied())
    }

    fn mean_user_rating(&self, user_id: UserId) -> EngineResult<RatingValue> {
        let ratings = self.user_ratings(user_id)?;
        Ok(mean_of(ratings.values()))
    }

    fn mean_item_rating(&self, item_id: ItemId) -> EngineResult<RatingValue> {
        let ratings = self.item_ratings(item_id)?;
        Ok(mean_of(ratings.values()))
    }
}

fn mean_of<'a>(ratings: impl Iterator<Item = &'a Rating>) -> RatingValue {
    let (sum, count) = ratings.fold((0.0, 0usize), |(sum, count), r| (sum + r.value, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Ratings indexed both by user and by item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryDataset {
    by_user: BTreeMap<UserId, UserRatings>,
    by_item: BTreeMap<ItemId, ItemRatings>,
    count: usize,
}

impl InMemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let mut dataset = Self::new();
        for rating in ratings {
            dataset.insert(rating);
        }
        dataset
    }

    /// Inserts a rating, replacing an earlier one for the same (user, item)
    pub fn insert(&mut self, rating: Rating) {
        let previous = self
            .by_user
            .entry(rating.user_id)
            .or_default()
            .insert(rating.item_id, rating);

        self.by_item
            .entry(rating.item_id)
            .or_default()
            .insert(rating.user_id, rating);

        if previous.is_none() {
            self.count += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn ratings(&self) -> impl Iterator<Item = &Rating> {
        self.by_user.values().flat_map(|ratings| ratings.values())
    }

    pub fn mean_rating(&self) -> Option<RatingValue> {
        if self.is_empty() {
            return None;
        }
        Some(mean_of(self.ratings()))
    }

    pub fn rating_range(&self) -> Option<(RatingValue, RatingValue)> {
        self.ratings().fold(None, |range, r| match range {
            None => Some((r.value, r.value)),
            Some((min, max)) => Some((min.min(r.value), max.max(r.value))),
        })
    }
}

impl RatingsDataset for InMemoryDataset {
    fn all_users(&self) -> Vec<UserId> {
        self.by_user.keys().copied().collect()
    }

    fn all_rated_items(&self) -> Vec<ItemId> {
        self.by_item.keys().copied().collect()
    }

    fn user_ratings(&self, user_id: UserId) -> EngineResult<&UserRatings> {
        self.by_user
            .get(&user_id)
            .ok_or(EngineError::UserNotFound(user_id))
    }

    fn item_ratings(&self, item_id: ItemId) -> EngineResult<&ItemRatings> {
        self.by_item
            .get(&item_id)
            .ok_or(EngineError::ItemNotFound(item_id))
    }

    fn num_ratings(&self) -> usize {
        self.count
    }
}

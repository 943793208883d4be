use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{InMemoryDataset, ItemId, RatingsDataset, UserId};
use crate::errors::{EngineError, EngineResult};

/// Items held out as test data, per user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    held_out: BTreeMap<UserId, BTreeSet<ItemId>>,
}

impl Fold {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold_out(&mut self, user_id: UserId, item_id: ItemId) -> bool {
        self.held_out.entry(user_id).or_default().insert(item_id)
    }

    pub fn held_out_for(&self, user_id: UserId) -> Option<&BTreeSet<ItemId>> {
        self.held_out.get(&user_id)
    }

    pub fn held_out_count(&self, user_id: UserId) -> usize {
        self.held_out_for(user_id).map_or(0, BTreeSet::len)
    }

    pub fn contains(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.held_out_for(user_id)
            .is_some_and(|items| items.contains(&item_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, &BTreeSet<ItemId>)> {
        self.held_out.iter().map(|(&user, items)| (user, items))
    }

    /// Total number of held-out ratings
    pub fn len(&self) -> usize {
        self.held_out.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of one validation technique run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    technique: String,
    seed: u64,
    folds: Vec<Fold>,
}

impl Partition {
    pub fn new(technique: impl Into<String>, seed: u64, folds: Vec<Fold>) -> Self {
        Self {
            technique: technique.into(),
            seed,
            folds,
        }
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn fold_count(&self) -> usize {
        self.folds.len()
    }

    pub fn fold(&self, index: usize) -> EngineResult<&Fold> {
        self.folds.get(index).ok_or_else(|| {
            EngineError::invalid(
                "fold",
                format!("index {} out of range for {} folds", index, self.folds.len()),
            )
        })
    }

    /// Held-out item count of one user in every fold
    pub fn user_fold_sizes(&self, user_id: UserId) -> Vec<usize> {
        self.folds
            .iter()
            .map(|fold| fold.held_out_count(user_id))
            .collect()
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        self.folds.iter().map(Fold::len).collect()
    }

    pub fn split(&self, dataset: &dyn RatingsDataset, index: usize) -> EngineResult<TrainTestSplit> {
        TrainTestSplit::from_fold(dataset, self.fold(index)?)
    }
}

/// Training and test datasets derived from one fold
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    training: InMemoryDataset,
    test: InMemoryDataset,
}

impl TrainTestSplit {
    pub fn from_fold(dataset: &dyn RatingsDataset, fold: &Fold) -> EngineResult<Self> {
        check_fold_against_dataset(dataset, fold)?;

        let mut training = InMemoryDataset::new();
        let mut test = InMemoryDataset::new();

        for user_id in dataset.all_users() {
            for rating in dataset.user_ratings(user_id)?.values() {
                if fold.contains(user_id, rating.item_id) {
                    test.insert(*rating);
                } else {
                    training.insert(*rating);
                }
            }
        }

        Ok(Self { training, test })
    }

    pub fn training(&self) -> &InMemoryDataset {
        &self.training
    }

    pub fn test(&self) -> &InMemoryDataset {
        &self.test
    }

    pub fn into_parts(self) -> (InMemoryDataset, InMemoryDataset) {
        (self.training, self.test)
    }
}

fn check_fold_against_dataset(dataset: &dyn RatingsDataset, fold: &Fold) -> EngineResult<()> {
    for (user_id, items) in fold.iter() {
        let rated = dataset.user_ratings(user_id)?;
        if let Some(missing) = items.iter().find(|item| !rated.contains_key(*item)) {
            return Err(EngineError::ItemNotFound(*missing));
        }
    }
    Ok(())
}

use log::{debug, info};

use super::{Fold, Partition, ValidationTechnique, check_fold_count, deal_round_robin};
use crate::domain::{ItemId, RatingsDataset};
use crate::errors::EngineResult;
use crate::progress::{ProgressHandle, ProgressTracker};
use crate::random::SeedHolder;

/// Per-user k-fold cross validation.
///
/// Users are visited in ascending id order. Each user's rated items are drawn
/// one at a time, uniformly from the items not drawn yet, and dealt to folds
/// round-robin starting at fold 0. A user's fold sizes therefore differ by at
/// most one, while global fold sizes depend on how many ratings each user has.
#[derive(Debug, Clone)]
pub struct CrossFoldValidation {
    folds: usize,
    seed: u64,
}

impl CrossFoldValidation {
    pub fn new(folds: usize, seed: u64) -> EngineResult<Self> {
        check_fold_count(folds)?;
        Ok(Self { folds, seed })
    }
}

impl SeedHolder for CrossFoldValidation {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl ValidationTechnique for CrossFoldValidation {
    fn name(&self) -> &'static str {
        "cross-fold"
    }

    fn fold_count(&self) -> usize {
        self.folds
    }

    fn partition(&self, dataset: &dyn RatingsDataset, progress: &ProgressHandle) -> EngineResult<Partition> {
        let users = dataset.all_users();
        info!(
            "Partitioning {} users into {} folds (seed {})",
            users.len(),
            self.folds,
            self.seed
        );

        let mut rng = self.rng();
        let mut folds = vec![Fold::new(); self.folds];
        let mut tracker = ProgressTracker::new("cross-fold validation", users.len());
        progress.report(tracker.start_event());

        for user_id in users {
            let pool: Vec<ItemId> = dataset.user_rated(user_id)?.into_iter().collect();
            deal_round_robin(&mut rng, pool, self.folds, |fold_index, item_id| {
                folds[fold_index].hold_out(user_id, item_id);
            });
            progress.report(tracker.record_completion());
        }

        if tracker.total() == 0 {
            progress.report(tracker.finish_event());
        }

        let partition = Partition::new(self.name(), self.seed, folds);
        debug!("Fold sizes: {:?}", partition.fold_sizes());
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating, UserId};
    use crate::errors::EngineError;
    use std::collections::BTreeSet;

    fn dataset() -> InMemoryDataset {
        let a = (1..=5).map(|item| Rating::new(1, item, 3.0));
        let b = [10, 11].into_iter().map(|item| Rating::new(2, item, 4.0));
        InMemoryDataset::from_ratings(a.chain(b))
    }

    fn partition(folds: usize, seed: u64) -> Partition {
        CrossFoldValidation::new(folds, seed)
            .unwrap()
            .partition(&dataset(), &ProgressHandle::disabled())
            .unwrap()
    }

    #[test]
    fn test_items_spread_one_per_fold() {
        let partition = partition(5, 42);

        assert_eq!(partition.user_fold_sizes(1), vec![1, 1, 1, 1, 1]);

        let b_sizes = partition.user_fold_sizes(2);
        assert_eq!(b_sizes.iter().filter(|&&size| size == 1).count(), 2);
        assert_eq!(b_sizes.iter().filter(|&&size| size == 0).count(), 3);
    }

    #[test]
    fn test_union_covers_user_ratings() {
        let partition = partition(3, 9);
        let data = dataset();

        for user in data.all_users() {
            let mut union = BTreeSet::new();
            for fold in partition.folds() {
                if let Some(items) = fold.held_out_for(user) {
                    for item in items {
                        assert!(union.insert(*item), "item {} held out twice", item);
                    }
                }
            }
            assert_eq!(union, data.user_rated(user).unwrap());
        }
    }

    #[test]
    fn test_seed_42_assignment_is_stable() {
        let expected: [&[(UserId, ItemId)]; 5] = [
            &[(1, 4), (2, 11)],
            &[(1, 2), (2, 10)],
            &[(1, 1)],
            &[(1, 3)],
            &[(1, 5)],
        ];
        let folds = expected
            .iter()
            .map(|held_out| {
                let mut fold = Fold::new();
                for &(user_id, item_id) in held_out.iter() {
                    fold.hold_out(user_id, item_id);
                }
                fold
            })
            .collect();

        assert_eq!(partition(5, 42), Partition::new("cross-fold", 42, folds));
    }

    #[test]
    fn test_same_seed_same_partition() {
        assert_eq!(partition(3, 1234), partition(3, 1234));
    }

    #[test]
    fn test_reseeding_restores_assignment() {
        let mut technique = CrossFoldValidation::new(5, 1).unwrap();
        let first = technique.partition(&dataset(), &ProgressHandle::disabled()).unwrap();

        technique.set_seed(2);
        technique.set_seed(1);
        let again = technique.partition(&dataset(), &ProgressHandle::disabled()).unwrap();

        assert_eq!(first, again);
    }

    #[test]
    fn test_single_fold_is_rejected() {
        assert!(matches!(
            CrossFoldValidation::new(1, 0),
            Err(EngineError::InvalidParameter { name: "folds", .. })
        ));
    }
}

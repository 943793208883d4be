use log::info;

use super::{Fold, Partition, ValidationTechnique};
use crate::domain::{ItemId, RatingsDataset};
use crate::errors::{EngineError, EngineResult};
use crate::progress::{ProgressHandle, ProgressTracker};
use crate::random::{SeedHolder, take_random};

/// Holds out a fixed fraction of every user's ratings in a single fold
#[derive(Debug, Clone)]
pub struct HoldOutRatings {
    test_fraction: f64,
    seed: u64,
}

impl HoldOutRatings {
    pub fn new(test_fraction: f64, seed: u64) -> EngineResult<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(EngineError::invalid(
                "test_fraction",
                format!("must be between 0 and 1 (exclusive), got {}", test_fraction),
            ));
        }
        Ok(Self {
            test_fraction,
            seed,
        })
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    fn test_size(&self, rated: usize) -> usize {
        ((rated as f64) * self.test_fraction).round() as usize
    }
}

impl SeedHolder for HoldOutRatings {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl ValidationTechnique for HoldOutRatings {
    fn name(&self) -> &'static str {
        "hold-out"
    }

    fn fold_count(&self) -> usize {
        1
    }

    fn partition(&self, dataset: &dyn RatingsDataset, progress: &ProgressHandle) -> EngineResult<Partition> {
        let users = dataset.all_users();
        info!(
            "Holding out {:.0}% of ratings for {} users (seed {})",
            self.test_fraction * 100.0,
            users.len(),
            self.seed
        );

        let mut rng = self.rng();
        let mut fold = Fold::new();
        let mut tracker = ProgressTracker::new("hold-out validation", users.len());
        progress.report(tracker.start_event());

        for user_id in users {
            let mut pool: Vec<ItemId> = dataset.user_rated(user_id)?.into_iter().collect();
            for _ in 0..self.test_size(pool.len()) {
                if let Some(item_id) = take_random(&mut rng, &mut pool) {
                    fold.hold_out(user_id, item_id);
                }
            }
            progress.report(tracker.record_completion());
        }

        if tracker.total() == 0 {
            progress.report(tracker.finish_event());
        }

        Ok(Partition::new(self.name(), self.seed, vec![fold]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating};

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::from_ratings(
            (1..=10)
                .map(|item| Rating::new(1, item, 3.0))
                .chain((1..=3).map(|item| Rating::new(2, item, 2.0))),
        )
    }

    #[test]
    fn test_fraction_of_each_user_is_held_out() {
        let technique = HoldOutRatings::new(0.2, 5).unwrap();
        let partition = technique.partition(&dataset(), &ProgressHandle::disabled()).unwrap();

        assert_eq!(partition.fold_count(), 1);
        assert_eq!(partition.user_fold_sizes(1), vec![2]);
        assert_eq!(partition.user_fold_sizes(2), vec![1]);
    }

    #[test]
    fn test_split_keeps_every_rating_once() {
        let data = dataset();
        let technique = HoldOutRatings::new(0.5, 5).unwrap();
        let partition = technique.partition(&data, &ProgressHandle::disabled()).unwrap();
        let split = partition.split(&data, 0).unwrap();

        assert_eq!(
            split.training().num_ratings() + split.test().num_ratings(),
            data.num_ratings()
        );
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(HoldOutRatings::new(0.0, 1).is_err());
        assert!(HoldOutRatings::new(1.0, 1).is_err());
        assert!(HoldOutRatings::new(f64::NAN, 1).is_err());
        assert!(HoldOutRatings::new(0.3, 1).is_ok());
    }
}

use std::collections::BTreeSet;

use log::info;

use super::{Fold, Partition, UserGroup, ValidationTechnique, check_fold_count, deal_round_robin};
use crate::domain::{ItemId, RatingsDataset, UserId};
use crate::errors::{EngineError, EngineResult};
use crate::progress::{ProgressHandle, ProgressTracker};
use crate::random::SeedHolder;

/// Cross validation where the unit of assignment is a group.
///
/// The items rated by any member of a group are dealt to folds together, so
/// all of a group's ratings for one item land in the same fold. Users outside
/// every group are treated as groups of one, after the explicit groups.
#[derive(Debug, Clone)]
pub struct GroupCrossFoldValidation {
    folds: usize,
    seed: u64,
    groups: Vec<UserGroup>,
}

impl GroupCrossFoldValidation {
    pub fn new(folds: usize, seed: u64, groups: Vec<UserGroup>) -> EngineResult<Self> {
        check_fold_count(folds)?;
        check_disjoint(&groups)?;
        Ok(Self {
            folds,
            seed,
            groups,
        })
    }

    pub fn groups(&self) -> &[UserGroup] {
        &self.groups
    }

    fn assignment_units(&self, dataset: &dyn RatingsDataset) -> Vec<Vec<UserId>> {
        let grouped: BTreeSet<UserId> = self
            .groups
            .iter()
            .flat_map(|group| group.members.iter().copied())
            .collect();

        let explicit = self.groups.iter().map(|group| group.members.clone());
        let singletons = dataset
            .all_users()
            .into_iter()
            .filter(|user| !grouped.contains(user))
            .map(|user| vec![user]);

        explicit.chain(singletons).collect()
    }
}

fn check_disjoint(groups: &[UserGroup]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for group in groups {
        for &member in &group.members {
            if !seen.insert(member) {
                return Err(EngineError::invalid(
                    "groups",
                    format!("user {} belongs to more than one group", member),
                ));
            }
        }
    }
    Ok(())
}

fn items_rated_by(dataset: &dyn RatingsDataset, members: &[UserId]) -> EngineResult<Vec<ItemId>> {
    let mut items = BTreeSet::new();
    for &member in members {
        items.extend(dataset.user_ratings(member)?.keys().copied());
    }
    Ok(items.into_iter().collect())
}

impl SeedHolder for GroupCrossFoldValidation {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl ValidationTechnique for GroupCrossFoldValidation {
    fn name(&self) -> &'static str {
        "group-cross-fold"
    }

    fn fold_count(&self) -> usize {
        self.folds
    }

    fn partition(&self, dataset: &dyn RatingsDataset, progress: &ProgressHandle) -> EngineResult<Partition> {
        let units = self.assignment_units(dataset);
        info!(
            "Partitioning {} groups ({} explicit) into {} folds (seed {})",
            units.len(),
            self.groups.len(),
            self.folds,
            self.seed
        );

        let mut rng = self.rng();
        let mut folds = vec![Fold::new(); self.folds];
        let mut tracker = ProgressTracker::new("group cross-fold validation", units.len());
        progress.report(tracker.start_event());

        for members in &units {
            let pool = items_rated_by(dataset, members)?;
            deal_round_robin(&mut rng, pool, self.folds, |fold_index, item_id| {
                for &member in members {
                    if dataset.rating(member, item_id).is_some() {
                        folds[fold_index].hold_out(member, item_id);
                    }
                }
            });
            progress.report(tracker.record_completion());
        }

        if tracker.total() == 0 {
            progress.report(tracker.finish_event());
        }

        Ok(Partition::new(self.name(), self.seed, folds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating};

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::from_ratings(vec![
            Rating::new(1, 10, 4.0),
            Rating::new(1, 11, 3.0),
            Rating::new(2, 10, 5.0),
            Rating::new(2, 12, 2.0),
            Rating::new(3, 10, 1.0),
            Rating::new(3, 13, 2.0),
        ])
    }

    fn group(id: usize, members: Vec<UserId>) -> UserGroup {
        UserGroup { id, members }
    }

    #[test]
    fn test_group_members_share_item_folds() {
        let technique = GroupCrossFoldValidation::new(2, 8, vec![group(0, vec![1, 2])]).unwrap();
        let partition = technique.partition(&dataset(), &ProgressHandle::disabled()).unwrap();

        let fold_of = |user: UserId, item: ItemId| {
            partition
                .folds()
                .iter()
                .position(|fold| fold.contains(user, item))
        };

        assert!(fold_of(1, 10).is_some());
        assert_eq!(fold_of(1, 10), fold_of(2, 10));
    }

    #[test]
    fn test_every_rating_lands_in_exactly_one_fold() {
        let data = dataset();
        let technique = GroupCrossFoldValidation::new(3, 2, vec![group(0, vec![1, 2])]).unwrap();
        let partition = technique.partition(&data, &ProgressHandle::disabled()).unwrap();

        for rating in data.ratings() {
            let hits = partition
                .folds()
                .iter()
                .filter(|fold| fold.contains(rating.user_id, rating.item_id))
                .count();
            assert_eq!(hits, 1);
        }
        assert_eq!(partition.fold_sizes().iter().sum::<usize>(), data.num_ratings());
    }

    #[test]
    fn test_overlapping_groups_are_rejected() {
        let groups = vec![group(0, vec![1, 2]), group(1, vec![2, 3])];

        assert!(matches!(
            GroupCrossFoldValidation::new(2, 1, groups),
            Err(EngineError::InvalidParameter { name: "groups", .. })
        ));
    }

    #[test]
    fn test_unknown_member_is_reported() {
        let technique = GroupCrossFoldValidation::new(2, 1, vec![group(0, vec![1, 99])]).unwrap();
        let result = technique.partition(&dataset(), &ProgressHandle::disabled());

        assert!(matches!(result, Err(EngineError::UserNotFound(99))));
    }
}

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{RatingsDataset, UserId};
use crate::errors::{EngineError, EngineResult};
use crate::random::{SeedHolder, take_random};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: usize,
    pub members: Vec<UserId>,
}

/// Forms a fixed number of disjoint random groups of equal size
#[derive(Debug, Clone)]
pub struct FixedSizeGroups {
    group_size: usize,
    num_groups: usize,
    seed: u64,
}

impl FixedSizeGroups {
    pub fn new(group_size: usize, num_groups: usize, seed: u64) -> EngineResult<Self> {
        if group_size == 0 {
            return Err(EngineError::invalid("group_size", "groups need at least one member"));
        }
        if num_groups == 0 {
            return Err(EngineError::invalid("num_groups", "at least one group is required"));
        }
        Ok(Self {
            group_size,
            num_groups,
            seed,
        })
    }

    pub fn required_members(&self) -> usize {
        self.group_size.saturating_mul(self.num_groups)
    }

    pub fn form(&self, dataset: &dyn RatingsDataset) -> EngineResult<Vec<UserGroup>> {
        self.form_from(dataset.all_users())
    }

    /// Draws members without repetition; fails before drawing anything when
    /// the population is too small
    pub fn form_from(&self, mut population: Vec<UserId>) -> EngineResult<Vec<UserGroup>> {
        population.sort_unstable();
        population.dedup();

        let capacity_error = EngineError::CapacityExceeded {
            requested: self.required_members(),
            available: population.len(),
        };
        if self.required_members() > population.len() {
            return Err(capacity_error);
        }

        info!(
            "Forming {} groups of {} from {} users (seed {})",
            self.num_groups,
            self.group_size,
            population.len(),
            self.seed
        );

        let mut rng = self.rng();
        let mut groups = Vec::with_capacity(self.num_groups);

        for id in 0..self.num_groups {
            let mut members = Vec::with_capacity(self.group_size);
            for _ in 0..self.group_size {
                let Some(member) = take_random(&mut rng, &mut population) else {
                    return Err(capacity_error);
                };
                members.push(member);
            }
            members.sort_unstable();
            groups.push(UserGroup { id, members });
        }

        Ok(groups)
    }
}

impl SeedHolder for FixedSizeGroups {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_groups_are_disjoint_and_sized() {
        let groups = FixedSizeGroups::new(3, 4, 11)
            .unwrap()
            .form_from((1..=20).collect())
            .unwrap();

        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.members.len() == 3));

        let members: BTreeSet<UserId> = groups.iter().flat_map(|g| g.members.clone()).collect();
        assert_eq!(members.len(), 12);
    }

    #[test]
    fn test_too_many_groups_fail_with_capacity_error() {
        let result = FixedSizeGroups::new(4, 3, 1).unwrap().form_from((1..=10).collect());

        assert!(matches!(
            result,
            Err(EngineError::CapacityExceeded {
                requested: 12,
                available: 10
            })
        ));
    }

    #[test]
    fn test_population_order_does_not_matter() {
        let technique = FixedSizeGroups::new(2, 2, 3).unwrap();
        let forward = technique.form_from((1..=6).collect()).unwrap();
        let backward = technique.form_from((1..=6).rev().collect()).unwrap();

        assert_eq!(forward, backward);
    }
}

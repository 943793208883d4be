use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use super::{load_dataset, with_manager};
use crate::config::AppConfig;
use crate::store::ResultStore;
use crate::validation::{FixedSizeGroups, GroupCrossFoldValidation, UserGroup, ValidationTechnique};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPartitionSummary {
    pub groups: Vec<UserGroup>,
    pub fold_sizes: Vec<usize>,
}

pub struct GroupService {
    config: AppConfig,
    store: ResultStore,
}

impl GroupService {
    pub fn new(config: AppConfig, store: ResultStore) -> Self {
        Self { config, store }
    }

    /// Forms the groups and partitions their ratings group by group.
    ///
    /// Fails with a capacity error before any task is scheduled when the
    /// dataset has too few users.
    pub fn run(&self, dataset_path: &Path, group_size: usize, num_groups: usize) -> Result<GroupPartitionSummary> {
        info!("=== Starting Group Formation ===");

        let settings = &self.config.validation;
        let dataset = load_dataset(dataset_path)?;
        let groups = FixedSizeGroups::new(group_size, num_groups, settings.seed)?.form(&dataset)?;
        for group in &groups {
            info!("  → Group {}: {:?}", group.id, group.members);
        }

        let technique = GroupCrossFoldValidation::new(settings.folds, settings.seed, groups.clone())?;
        let partition = with_manager(&self.config, |manager| {
            technique.partition(&dataset, manager.progress())
        })?;

        let summary = GroupPartitionSummary {
            groups,
            fold_sizes: partition.fold_sizes(),
        };
        self.store.save(&format!("groups-{}", settings.seed), &summary)?;

        info!("=== Group Formation Complete ===");
        Ok(summary)
    }
}

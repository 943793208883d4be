use std::path::Path;

use anyhow::Result;
use log::info;

use super::{load_dataset, with_manager};
use crate::config::AppConfig;
use crate::store::ResultStore;
use crate::validation::{CrossFoldValidation, HoldOutRatings, Partition, ValidationTechnique};

pub struct PartitionService {
    config: AppConfig,
    store: ResultStore,
}

impl PartitionService {
    pub fn new(config: AppConfig, store: ResultStore) -> Self {
        Self { config, store }
    }

    /// Splits the dataset into folds, or a single hold-out fold when
    /// `hold_out_fraction` is configured
    pub fn run(&self, dataset_path: &Path) -> Result<Partition> {
        info!("=== Starting Partitioning ===");

        let dataset = load_dataset(dataset_path)?;
        let settings = &self.config.validation;
        let technique: Box<dyn ValidationTechnique> = match settings.hold_out_fraction {
            Some(fraction) => Box::new(HoldOutRatings::new(fraction, settings.seed)?),
            None => Box::new(CrossFoldValidation::new(settings.folds, settings.seed)?),
        };

        let partition = with_manager(&self.config, |manager| {
            technique.partition(&dataset, manager.progress())
        })?;

        for (index, size) in partition.fold_sizes().iter().enumerate() {
            info!("  → Fold {}: {} held-out ratings", index + 1, size);
        }

        let key = format!("partition-{}", partition.seed());
        self.store.save(&key, &partition)?;

        info!("=== Partitioning Complete ===");
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_ratings(dir: &Path) -> std::path::PathBuf {
        let content: String = (1..=4)
            .flat_map(|user| (1..=10).map(move |item| format!("{},{},{}\n", user, item, item % 5 + 1)))
            .collect();
        let path = dir.join("ratings.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn config(hold_out_fraction: Option<f64>) -> AppConfig {
        let mut config = AppConfig::new();
        config.execution.parallelism = Some(1);
        config.validation.folds = 3;
        config.validation.seed = 5;
        config.validation.hold_out_fraction = hold_out_fraction;
        config
    }

    #[test]
    fn test_configured_fraction_selects_hold_out() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_ratings(dir.path());
        let store = ResultStore::new(dir.path().join("results")).unwrap();

        let partition = PartitionService::new(config(Some(0.3)), store).run(&dataset).unwrap();

        assert_eq!(partition.technique(), "hold-out");
        assert_eq!(partition.fold_sizes(), vec![12]);
        assert!(dir.path().join("results").join("partition-5.json").exists());
    }

    #[test]
    fn test_cross_fold_without_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_ratings(dir.path());
        let store = ResultStore::new(dir.path()).unwrap();

        let partition = PartitionService::new(config(None), store).run(&dataset).unwrap();

        assert_eq!(partition.technique(), "cross-fold");
        assert_eq!(partition.fold_count(), 3);
        assert_eq!(partition.fold_sizes().iter().sum::<usize>(), 40);
    }
}

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use log::info;

use super::{load_dataset, with_manager};
use crate::config::AppConfig;
use crate::evaluation::{CrossValidationExperiment, ExperimentReport};
use crate::recommend::AlgorithmRegistry;
use crate::store::ResultStore;
use crate::validation::CrossFoldValidation;

pub struct EvaluationService {
    config: AppConfig,
    registry: AlgorithmRegistry,
    store: ResultStore,
}

impl EvaluationService {
    pub fn new(config: AppConfig, registry: AlgorithmRegistry, store: ResultStore) -> Self {
        Self {
            config,
            registry,
            store,
        }
    }

    pub fn run(&self, dataset_path: &Path) -> Result<ExperimentReport> {
        info!("=== Starting Evaluation ===");

        let settings = &self.config.validation;
        let algorithm = self.registry.recommender(&self.config.evaluation.algorithm)?;
        let technique = CrossFoldValidation::new(settings.folds, settings.seed)?;
        let dataset = load_dataset(dataset_path)?;

        let experiment =
            CrossValidationExperiment::new(&technique, algorithm, self.config.evaluation.relevance_threshold);
        let report = with_manager(&self.config, |manager| experiment.run(&dataset, manager))?;

        log_summary(&report);
        let key = format!("evaluation-{}-{}", report.algorithm, report.seed);
        self.store.save(&key, &report)?;

        info!("=== Evaluation Complete ===");
        Ok(report)
    }
}

fn log_summary(report: &ExperimentReport) {
    let summary = &report.summary;
    info!("{}", format!("Results for {}", report.algorithm).bold());
    info!("  MAE:       {}", format_measure(summary.mae));
    info!("  RMSE:      {}", format_measure(summary.rmse));
    info!("  Coverage:  {}", format_measure(summary.coverage));
    info!("  Precision: {}", format_measure(summary.precision));
}

fn format_measure(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.4}", value).green().to_string(),
        None => "n/a".yellow().to_string(),
    }
}

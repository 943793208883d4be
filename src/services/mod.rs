pub mod evaluation;
pub mod groups;
pub mod partition;
pub mod trust_graph;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::domain::InMemoryDataset;
use crate::errors::EngineResult;
use crate::execution::ParallelExecutionManager;
use crate::loading::RatingsFileLoader;
use crate::progress::{ConsoleProgressListener, ProgressReporter};

pub fn load_dataset(path: &Path) -> Result<InMemoryDataset> {
    RatingsFileLoader::new()?.load(path)
}

/// Runs `work` with a manager whose progress goes to the console.
///
/// The reporter thread is joined before returning, so every progress line
/// is printed before the caller logs its results.
pub fn with_manager<T>(
    config: &AppConfig,
    work: impl FnOnce(&ParallelExecutionManager) -> EngineResult<T>,
) -> Result<T> {
    let reporter = ProgressReporter::spawn(ConsoleProgressListener, &config.progress)
        .context("Failed to start progress reporter")?;

    let result = ParallelExecutionManager::from_settings(&config.execution, reporter.handle())
        .and_then(|manager| work(&manager));

    reporter.finish();
    Ok(result?)
}

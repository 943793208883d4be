pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod evaluation;
pub mod execution;
pub mod loading;
pub mod progress;
pub mod random;
pub mod recommend;
pub mod services;
pub mod store;
pub mod trust;
pub mod validation;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::info;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::recommend::AlgorithmRegistry;
use crate::services::evaluation::EvaluationService;
use crate::services::groups::GroupService;
use crate::services::partition::PartitionService;
use crate::services::trust_graph::TrustGraphService;
use crate::store::ResultStore;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::new()),
    }
}

fn open_store() -> Result<ResultStore> {
    ResultStore::new(config::output_dir())
}

pub fn handle_partition(
    mut config: AppConfig,
    dataset: &Path,
    folds: Option<usize>,
    seed: Option<u64>,
    hold_out: Option<f64>,
) -> Result<()> {
    apply_validation_overrides(&mut config, folds, seed);
    if hold_out.is_some() {
        config.validation.hold_out_fraction = hold_out;
    }
    let service = PartitionService::new(config, open_store()?);
    service.run(dataset)?;
    Ok(())
}

pub fn handle_evaluate(
    mut config: AppConfig,
    dataset: &Path,
    algorithm: Option<String>,
    folds: Option<usize>,
    seed: Option<u64>,
    threads: Option<usize>,
) -> Result<()> {
    apply_validation_overrides(&mut config, folds, seed);
    if let Some(algorithm) = algorithm {
        config.evaluation.algorithm = algorithm;
    }
    if threads.is_some() {
        config.execution.parallelism = threads;
    }

    let registry = AlgorithmRegistry::with_defaults(&config.trust)?;
    let service = EvaluationService::new(config, registry, open_store()?);
    service.run(dataset)?;
    Ok(())
}

pub fn handle_trust_graph(
    mut config: AppConfig,
    dataset: &Path,
    measure: Option<String>,
    threads: Option<usize>,
    max_users: Option<usize>,
) -> Result<()> {
    if let Some(measure) = measure {
        config.trust.measure = measure;
    }
    if threads.is_some() {
        config.execution.parallelism = threads;
    }

    let registry = AlgorithmRegistry::with_defaults(&config.trust)?;
    let service = TrustGraphService::new(config, registry, open_store()?);
    service.run(dataset, max_users)?;
    Ok(())
}

pub fn handle_groups(
    mut config: AppConfig,
    dataset: &Path,
    group_size: usize,
    num_groups: usize,
    seed: Option<u64>,
) -> Result<()> {
    apply_validation_overrides(&mut config, None, seed);
    let service = GroupService::new(config, open_store()?);
    service.run(dataset, group_size, num_groups)?;
    Ok(())
}

pub fn handle_algorithms(config: &AppConfig) -> Result<()> {
    let registry = AlgorithmRegistry::with_defaults(&config.trust)?;

    info!("Recommenders:");
    for algorithm in registry.recommenders() {
        info!("  {:<14} {}", algorithm.name(), algorithm.description());
    }
    info!("Trust measures: {}", registry.trust_measure_names().join(", "));
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn apply_validation_overrides(config: &mut AppConfig, folds: Option<usize>, seed: Option<u64>) {
    if let Some(folds) = folds {
        config.validation.folds = folds;
    }
    if let Some(seed) = seed {
        config.validation.seed = seed;
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Partition {
            dataset,
            folds,
            seed,
            hold_out,
        } => handle_partition(config, &dataset, folds, seed, hold_out),
        Command::Evaluate {
            dataset,
            algorithm,
            folds,
            seed,
            threads,
        } => handle_evaluate(config, &dataset, algorithm, folds, seed, threads),
        Command::TrustGraph {
            dataset,
            measure,
            threads,
            max_users,
        } => handle_trust_graph(config, &dataset, measure, threads, max_users),
        Command::Groups {
            dataset,
            group_size,
            num_groups,
            seed,
        } => handle_groups(config, &dataset, group_size, num_groups, seed),
        Command::Algorithms => handle_algorithms(&config),
        Command::Completions { shell } => handle_completions(shell),
    }
}

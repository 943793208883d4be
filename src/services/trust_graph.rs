use std::path::Path;

use anyhow::Result;
use log::info;

use super::{load_dataset, with_manager};
use crate::config::AppConfig;
use crate::domain::RatingsDataset;
use crate::recommend::AlgorithmRegistry;
use crate::store::ResultStore;
use crate::trust::{GraphSummary, TrustGraphBuilder};

const TOP_CENTRAL_USERS: usize = 5;

pub struct TrustGraphService {
    config: AppConfig,
    registry: AlgorithmRegistry,
    store: ResultStore,
}

impl TrustGraphService {
    pub fn new(config: AppConfig, registry: AlgorithmRegistry, store: ResultStore) -> Self {
        Self {
            config,
            registry,
            store,
        }
    }

    /// Builds the graph over the first `max_users` users (by id), or all of them
    pub fn run(&self, dataset_path: &Path, max_users: Option<usize>) -> Result<GraphSummary> {
        info!("=== Starting Trust Graph Construction ===");

        let measure = self.registry.trust_measure(&self.config.trust.measure)?;
        let dataset = load_dataset(dataset_path)?;

        let mut population = dataset.all_users();
        if let Some(limit) = max_users {
            population.truncate(limit);
        }

        let builder = TrustGraphBuilder::new(&dataset, measure).with_population(population);
        let graph = with_manager(&self.config, |manager| builder.build(manager))?;
        let summary = graph.summary();

        info!("  → Density: {:.4}", summary.density);
        match summary.diameter {
            Some(diameter) => info!("  → Diameter: {:.4}", diameter),
            None => info!("  → Diameter: undefined (no connected pairs)"),
        }
        let mut ranked = summary.centrality.clone();
        ranked.sort_by(|a, b| b.closeness.total_cmp(&a.closeness));
        for node in ranked.iter().take(TOP_CENTRAL_USERS) {
            info!("  → User {}: closeness {:.4}", node.user_id, node.closeness);
        }

        let key = format!("trust-graph-{}", measure.name());
        self.store.save(&key, &summary)?;

        info!("=== Trust Graph Complete ===");
        Ok(summary)
    }
}

use log::{debug, info};

use super::graph::WeightedGraph;
use super::pairwise::PairwiseTrust;
use super::task::PairwiseTrustExecutor;
use crate::domain::{RatingsDataset, UserId, UserPair};
use crate::errors::EngineResult;
use crate::execution::ParallelExecutionManager;

/// Unbuilt trust graph: a population and the measure to link it with.
///
/// `build` consumes the builder, runs one task per unordered user pair and
/// yields the finished, immutable graph.
pub struct TrustGraphBuilder<'a> {
    dataset: &'a dyn RatingsDataset,
    measure: &'a dyn PairwiseTrust,
    population: Vec<UserId>,
}

impl<'a> TrustGraphBuilder<'a> {
    pub fn new(dataset: &'a dyn RatingsDataset, measure: &'a dyn PairwiseTrust) -> Self {
        Self {
            dataset,
            measure,
            population: dataset.all_users(),
        }
    }

    pub fn with_population(mut self, mut population: Vec<UserId>) -> Self {
        population.sort_unstable();
        population.dedup();
        self.population = population;
        self
    }

    pub fn population(&self) -> &[UserId] {
        &self.population
    }

    /// Every unordered pair of distinct users, lower id first
    pub fn pairs(&self) -> Vec<UserPair> {
        self.population
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| self.population[i + 1..].iter().map(move |&b| UserPair::new(a, b)))
            .collect()
    }

    pub fn build(self, manager: &ParallelExecutionManager) -> EngineResult<WeightedGraph> {
        let pairs = self.pairs();
        info!(
            "Building {} trust graph over {} users ({} pairs)",
            self.measure.name(),
            self.population.len(),
            pairs.len()
        );

        let executor = PairwiseTrustExecutor::new(self.dataset, self.measure);
        let job_name = format!("{} trust graph", self.measure.name());
        let report = manager.run(&job_name, pairs, &executor)?;
        debug!("'{}' scored {} pairs in {:?}", report.job_name(), report.submitted(), report.elapsed());

        let edges = report.into_completed().into_iter().filter_map(|task| {
            let result = task.output;
            result
                .weight
                .map(|weight| (result.pair.first, result.pair.second, weight))
        });

        let graph = WeightedGraph::from_edges(self.population, edges)?;
        info!(
            "  → {} edges, density {:.3}",
            graph.edge_count(),
            graph.density()
        );
        Ok(graph)
    }
}

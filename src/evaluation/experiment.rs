use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use super::measures::{FoldMeasures, MeasureSummary, Prediction};
use crate::domain::{InMemoryDataset, RatingValue, RatingsDataset};
use crate::errors::EngineResult;
use crate::execution::ParallelExecutionManager;
use crate::recommend::{RecommendationExecutor, RecommendationRequest, RecommenderAlgorithm, UserRecommendations};
use crate::validation::{Partition, ValidationTechnique};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub algorithm: String,
    pub technique: String,
    pub seed: u64,
    pub relevance_threshold: RatingValue,
    pub folds: Vec<FoldMeasures>,
    pub summary: MeasureSummary,
}

/// Partitions a dataset, then trains and scores one model per fold
pub struct CrossValidationExperiment<'a> {
    technique: &'a dyn ValidationTechnique,
    algorithm: &'a dyn RecommenderAlgorithm,
    relevance_threshold: RatingValue,
}

impl<'a> CrossValidationExperiment<'a> {
    pub fn new(
        technique: &'a dyn ValidationTechnique,
        algorithm: &'a dyn RecommenderAlgorithm,
        relevance_threshold: RatingValue,
    ) -> Self {
        Self {
            technique,
            algorithm,
            relevance_threshold,
        }
    }

    pub fn run(&self, dataset: &dyn RatingsDataset, manager: &ParallelExecutionManager) -> EngineResult<ExperimentReport> {
        info!(
            "=== Evaluating '{}' with {} ===",
            self.algorithm.name(),
            self.technique.name()
        );

        let partition = self.technique.partition(dataset, manager.progress())?;
        let folds = (0..partition.fold_count())
            .map(|index| self.evaluate_fold(dataset, &partition, index, manager))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(ExperimentReport {
            algorithm: self.algorithm.name().to_string(),
            technique: partition.technique().to_string(),
            seed: partition.seed(),
            relevance_threshold: self.relevance_threshold,
            summary: MeasureSummary::from_folds(&folds),
            folds,
        })
    }

    fn evaluate_fold(
        &self,
        dataset: &dyn RatingsDataset,
        partition: &Partition,
        index: usize,
        manager: &ParallelExecutionManager,
    ) -> EngineResult<FoldMeasures> {
        let (training, test) = partition.split(dataset, index)?.into_parts();
        info!(
            "  → Fold {}: {} training / {} test ratings",
            index + 1,
            training.num_ratings(),
            test.num_ratings()
        );

        let model = self.algorithm.build_model(&training)?;
        let executor = RecommendationExecutor::new(&training, model.as_ref());
        let job_name = format!("fold {} recommendations", index + 1);
        let outputs = manager
            .run(&job_name, requests_for(&test)?, &executor)?
            .into_sorted_outputs();

        let predictions = collect_predictions(&test, &outputs)?;
        let measures = FoldMeasures::from_predictions(index, &predictions, self.relevance_threshold);
        info!(
            "  → Fold {}: MAE {:?}, coverage {:.3}",
            index + 1,
            measures.mae,
            measures.coverage
        );
        Ok(measures)
    }
}

fn requests_for(test: &InMemoryDataset) -> EngineResult<Vec<RecommendationRequest>> {
    test.all_users()
        .into_iter()
        .map(|user_id| {
            let candidates = test.user_rated(user_id)?.into_iter().collect();
            Ok(RecommendationRequest::new(user_id, candidates))
        })
        .collect()
}

fn collect_predictions(test: &InMemoryDataset, outputs: &[UserRecommendations]) -> EngineResult<Vec<Prediction>> {
    let mut predictions = Vec::with_capacity(test.num_ratings());

    for output in outputs {
        let scores: HashMap<_, _> = output
            .recommendations
            .iter()
            .map(|r| (r.item_id, r.prediction))
            .collect();

        for rating in test.user_ratings(output.user_id)?.values() {
            predictions.push(Prediction {
                user_id: rating.user_id,
                item_id: rating.item_id,
                actual: rating.value,
                predicted: scores.get(&rating.item_id).copied(),
            });
        }
    }
    Ok(predictions)
}

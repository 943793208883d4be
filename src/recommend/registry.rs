use std::collections::BTreeMap;

use super::algorithm::RecommenderAlgorithm;
use super::baseline::{BiasBaseline, ItemMean, MeanRating, UserMean};
use crate::config::TrustSettings;
use crate::errors::{EngineError, EngineResult};
use crate::trust::{JaccardTrust, PairwiseTrust, PenalizedPearson};

/// Named recommenders and trust measures available to the CLI
pub struct AlgorithmRegistry {
    recommenders: BTreeMap<&'static str, Box<dyn RecommenderAlgorithm>>,
    trust_measures: BTreeMap<&'static str, Box<dyn PairwiseTrust>>,
}

impl AlgorithmRegistry {
    pub fn empty() -> Self {
        Self {
            recommenders: BTreeMap::new(),
            trust_measures: BTreeMap::new(),
        }
    }

    pub fn with_defaults(trust: &TrustSettings) -> EngineResult<Self> {
        let mut registry = Self::empty();
        registry.register_recommender(Box::new(MeanRating));
        registry.register_recommender(Box::new(UserMean));
        registry.register_recommender(Box::new(ItemMean));
        registry.register_recommender(Box::new(BiasBaseline));
        registry.register_trust(Box::new(PenalizedPearson::from_settings(trust)?));
        registry.register_trust(Box::new(JaccardTrust));
        Ok(registry)
    }

    /// Later registrations replace earlier ones with the same name
    pub fn register_recommender(&mut self, algorithm: Box<dyn RecommenderAlgorithm>) {
        self.recommenders.insert(algorithm.name(), algorithm);
    }

    pub fn register_trust(&mut self, measure: Box<dyn PairwiseTrust>) {
        self.trust_measures.insert(measure.name(), measure);
    }

    pub fn recommender(&self, name: &str) -> EngineResult<&dyn RecommenderAlgorithm> {
        self.recommenders
            .get(name)
            .map(|algorithm| algorithm.as_ref())
            .ok_or_else(|| EngineError::UnknownAlgorithm(name.to_string()))
    }

    pub fn trust_measure(&self, name: &str) -> EngineResult<&dyn PairwiseTrust> {
        self.trust_measures
            .get(name)
            .map(|measure| measure.as_ref())
            .ok_or_else(|| EngineError::UnknownAlgorithm(name.to_string()))
    }

    pub fn recommenders(&self) -> impl Iterator<Item = &dyn RecommenderAlgorithm> {
        self.recommenders.values().map(|algorithm| algorithm.as_ref())
    }

    pub fn trust_measure_names(&self) -> Vec<&'static str> {
        self.trust_measures.keys().copied().collect()
    }
}

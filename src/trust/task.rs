use serde::{Deserialize, Serialize};

use super::pairwise::PairwiseTrust;
use crate::domain::{RatingsDataset, UserPair};
use crate::errors::{EngineError, EngineResult};
use crate::execution::SingleTaskExecutor;

/// Result of one pairwise trust task; `None` means no edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTrust {
    pub pair: UserPair,
    pub weight: Option<f64>,
}

/// Computes trust for one user pair per task
pub struct PairwiseTrustExecutor<'a> {
    dataset: &'a dyn RatingsDataset,
    measure: &'a dyn PairwiseTrust,
}

impl<'a> PairwiseTrustExecutor<'a> {
    pub fn new(dataset: &'a dyn RatingsDataset, measure: &'a dyn PairwiseTrust) -> Self {
        Self { dataset, measure }
    }
}

impl SingleTaskExecutor for PairwiseTrustExecutor<'_> {
    type Input = UserPair;
    type Output = PairTrust;

    fn execute(&self, pair: UserPair) -> EngineResult<PairTrust> {
        let weight = self.measure.trust(self.dataset, pair.first, pair.second)?;
        Ok(PairTrust {
            pair,
            weight: check_weight(self.measure.name(), weight)?,
        })
    }
}

fn check_weight(measure: &str, weight: Option<f64>) -> EngineResult<Option<f64>> {
    match weight {
        Some(value) if value.is_nan() => Ok(None),
        Some(value) if !(0.0..=1.0).contains(&value) => Err(EngineError::invalid(
            "trust",
            format!("{} produced {} outside [0, 1]", measure, value),
        )),
        other => Ok(other),
    }
}

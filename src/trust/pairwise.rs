use crate::config::TrustSettings;
use crate::domain::{RatingsDataset, UserId, UserRatings};
use crate::errors::{EngineError, EngineResult};

/// Trust between two users, in [0, 1].
///
/// `Ok(None)` means the value is undefined for the pair (too little overlap,
/// no variance) and is not an error.
pub trait PairwiseTrust: Send + Sync {
    fn name(&self) -> &'static str;

    fn trust(&self, dataset: &dyn RatingsDataset, user_a: UserId, user_b: UserId) -> EngineResult<Option<f64>>;
}

/// Pearson correlation over co-rated items with significance weighting.
///
/// The correlation is scaled by `min(common, penalty) / penalty` and mapped
/// from [-1, 1] onto [0, 1].
#[derive(Debug, Clone)]
pub struct PenalizedPearson {
    penalty: usize,
    min_common: usize,
}

impl PenalizedPearson {
    pub fn new(penalty: usize, min_common: usize) -> EngineResult<Self> {
        if penalty == 0 {
            return Err(EngineError::invalid("pearson_penalty", "must be at least 1"));
        }
        Ok(Self {
            penalty,
            min_common: min_common.max(2),
        })
    }

    pub fn from_settings(settings: &TrustSettings) -> EngineResult<Self> {
        Self::new(settings.pearson_penalty, settings.min_common_items)
    }
}

impl PairwiseTrust for PenalizedPearson {
    fn name(&self) -> &'static str {
        "pearson"
    }

    fn trust(&self, dataset: &dyn RatingsDataset, user_a: UserId, user_b: UserId) -> EngineResult<Option<f64>> {
        let pairs = co_rated_values(dataset.user_ratings(user_a)?, dataset.user_ratings(user_b)?);
        if pairs.len() < self.min_common {
            return Ok(None);
        }

        let Some(correlation) = pearson(&pairs) else {
            return Ok(None);
        };

        let significance = pairs.len().min(self.penalty) as f64 / self.penalty as f64;
        Ok(Some(to_unit_interval(correlation * significance)))
    }
}

/// Share of co-rated items among all items rated by either user.
///
/// Users with no item in common have no trust value.
#[derive(Debug, Clone, Default)]
pub struct JaccardTrust;

impl PairwiseTrust for JaccardTrust {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn trust(&self, dataset: &dyn RatingsDataset, user_a: UserId, user_b: UserId) -> EngineResult<Option<f64>> {
        let a = dataset.user_ratings(user_a)?;
        let b = dataset.user_ratings(user_b)?;

        let common = a.keys().filter(|item| b.contains_key(*item)).count();
        if common == 0 {
            return Ok(None);
        }
        let union = a.len() + b.len() - common;
        Ok(Some(common as f64 / union as f64))
    }
}

fn co_rated_values(a: &UserRatings, b: &UserRatings) -> Vec<(f64, f64)> {
    let (smaller, larger, swapped) = if a.len() <= b.len() { (a, b, false) } else { (b, a, true) };

    smaller
        .iter()
        .filter_map(|(item, rating)| {
            let other = larger.get(item)?;
            Some(if swapped {
                (other.value, rating.value)
            } else {
                (rating.value, other.value)
            })
        })
        .collect()
}

/// Centred on each user's mean over the co-rated items only
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (covariance, var_a, var_b) = pairs.iter().fold((0.0, 0.0, 0.0), |(cov, va, vb), &(x, y)| {
        let dx = x - mean_a;
        let dy = y - mean_b;
        (cov + dx * dy, va + dx * dx, vb + dy * dy)
    });

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((covariance / denominator).clamp(-1.0, 1.0))
}

fn to_unit_interval(correlation: f64) -> f64 {
    ((correlation + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryDataset, Rating};

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::from_ratings(vec![
            Rating::new(1, 10, 1.0),
            Rating::new(1, 11, 2.0),
            Rating::new(1, 12, 3.0),
            Rating::new(2, 10, 2.0),
            Rating::new(2, 11, 4.0),
            Rating::new(2, 12, 6.0),
            Rating::new(3, 10, 3.0),
            Rating::new(3, 11, 2.0),
            Rating::new(3, 12, 1.0),
            Rating::new(4, 10, 5.0),
            Rating::new(4, 11, 5.0),
            Rating::new(5, 99, 5.0),
        ])
    }

    #[test]
    fn test_perfect_correlation_without_penalty() {
        let measure = PenalizedPearson::new(1, 2).unwrap();
        let data = dataset();

        assert_eq!(measure.trust(&data, 1, 2).unwrap(), Some(1.0));
        assert_eq!(measure.trust(&data, 1, 3).unwrap(), Some(0.0));
        assert_eq!(measure.trust(&data, 2, 1).unwrap(), measure.trust(&data, 1, 2).unwrap());
    }

    #[test]
    fn test_items_rated_by_one_user_do_not_shift_means() {
        let data = InMemoryDataset::from_ratings(vec![
            Rating::new(1, 10, 1.0),
            Rating::new(1, 11, 2.0),
            Rating::new(1, 12, 3.0),
            Rating::new(1, 13, 5.0),
            Rating::new(2, 10, 2.0),
            Rating::new(2, 11, 4.0),
            Rating::new(2, 12, 6.0),
        ]);
        let measure = PenalizedPearson::new(1, 2).unwrap();

        assert_eq!(measure.trust(&data, 1, 2).unwrap(), Some(1.0));
    }

    #[test]
    fn test_penalty_shrinks_towards_neutral() {
        let measure = PenalizedPearson::new(6, 2).unwrap();
        let trust = measure.trust(&dataset(), 1, 2).unwrap().unwrap();

        assert!((trust - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_cases() {
        let measure = PenalizedPearson::new(10, 2).unwrap();
        let data = dataset();

        assert_eq!(measure.trust(&data, 1, 4).unwrap(), None);
        assert_eq!(measure.trust(&data, 1, 5).unwrap(), None);
        assert!(matches!(measure.trust(&data, 1, 42), Err(EngineError::UserNotFound(42))));
    }

    #[test]
    fn test_jaccard_overlap() {
        let data = dataset();

        assert_eq!(JaccardTrust.trust(&data, 1, 2).unwrap(), Some(1.0));
        assert_eq!(JaccardTrust.trust(&data, 1, 4).unwrap(), Some(2.0 / 3.0));
        assert_eq!(JaccardTrust.trust(&data, 1, 5).unwrap(), None);
        assert_eq!(JaccardTrust.trust(&data, 5, 1).unwrap(), None);
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, RatingValue, UserId};

/// A held-out rating next to what the model predicted for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub actual: RatingValue,
    pub predicted: Option<RatingValue>,
}

fn scored(predictions: &[Prediction]) -> impl Iterator<Item = (RatingValue, RatingValue)> + '_ {
    predictions
        .iter()
        .filter_map(|p| p.predicted.map(|predicted| (p.actual, predicted)))
}

/// Mean absolute error over the predictions that have a value
pub fn mae(predictions: &[Prediction]) -> Option<f64> {
    mean(scored(predictions).map(|(actual, predicted)| (actual - predicted).abs()))
}

pub fn rmse(predictions: &[Prediction]) -> Option<f64> {
    mean(scored(predictions).map(|(actual, predicted)| (actual - predicted).powi(2))).map(f64::sqrt)
}

/// Fraction of test ratings the model produced a prediction for
pub fn coverage(predictions: &[Prediction]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    scored(predictions).count() as f64 / predictions.len() as f64
}

/// Among predictions at or above `threshold`, the fraction whose actual
/// rating is also at or above it
pub fn precision(predictions: &[Prediction], threshold: RatingValue) -> Option<f64> {
    let (hits, selected) = scored(predictions)
        .filter(|&(_, predicted)| predicted >= threshold)
        .fold((0usize, 0usize), |(hits, selected), (actual, _)| {
            (hits + usize::from(actual >= threshold), selected + 1)
        });

    if selected == 0 {
        None
    } else {
        Some(hits as f64 / selected as f64)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { None } else { Some(sum / count as f64) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldMeasures {
    pub fold: usize,
    pub test_ratings: usize,
    pub predicted: usize,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub coverage: f64,
    pub precision: Option<f64>,
}

impl FoldMeasures {
    pub fn from_predictions(fold: usize, predictions: &[Prediction], threshold: RatingValue) -> Self {
        Self {
            fold,
            test_ratings: predictions.len(),
            predicted: scored(predictions).count(),
            mae: mae(predictions),
            rmse: rmse(predictions),
            coverage: coverage(predictions),
            precision: precision(predictions, threshold),
        }
    }
}

/// Means across folds; folds where a measure is undefined are skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSummary {
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub coverage: Option<f64>,
    pub precision: Option<f64>,
}

impl MeasureSummary {
    pub fn from_folds(folds: &[FoldMeasures]) -> Self {
        Self {
            mae: mean(folds.iter().filter_map(|f| f.mae)),
            rmse: mean(folds.iter().filter_map(|f| f.rmse)),
            coverage: mean(folds.iter().map(|f| f.coverage)),
            precision: mean(folds.iter().filter_map(|f| f.precision)),
        }
    }
}

//! Accuracy measures and the cross-validation experiment driver.

mod experiment;
mod measures;

pub use experiment::{CrossValidationExperiment, ExperimentReport};
pub use measures::{FoldMeasures, MeasureSummary, Prediction, coverage, mae, precision, rmse};

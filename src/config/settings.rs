use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::config_context;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Worker threads per batch; `None` uses the available hardware concurrency
    pub parallelism: Option<usize>,
}

impl ExecutionSettings {
    pub fn resolved_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(default_parallelism)
    }
}

pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    pub min_interval_ms: u64,
    pub channel_capacity: usize,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: 2000,
            channel_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub folds: usize,
    pub seed: u64,
    /// When set, `partition` holds out this fraction of each user's ratings
    /// instead of running cross-fold validation
    pub hold_out_fraction: Option<f64>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            folds: 5,
            seed: 77_777,
            hold_out_fraction: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustSettings {
    pub measure: String,
    /// Common items needed before a Pearson correlation counts at full weight
    pub pearson_penalty: usize,
    pub min_common_items: usize,
}

impl Default for TrustSettings {
    fn default() -> Self {
        Self {
            measure: "pearson".to_string(),
            pearson_penalty: 50,
            min_common_items: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub algorithm: String,
    /// Ratings at or above this value count as relevant
    pub relevance_threshold: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            algorithm: "bias-baseline".to_string(),
            relevance_threshold: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub execution: ExecutionSettings,
    pub progress: ProgressSettings,
    pub validation: ValidationSettings,
    pub trust: TrustSettings,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config file; missing sections keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| config_context(&path.display().to_string()))?;
        serde_json::from_str(&json).with_context(|| config_context(&path.display().to_string()))
    }
}

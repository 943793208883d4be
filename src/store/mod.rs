use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::store_context;

/// A persisted run result with the time it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult<T> {
    pub key: String,
    pub generated_at: DateTime<Utc>,
    pub data: T,
}

/// JSON files of run results, one per key
pub struct ResultStore {
    output_dir: PathBuf,
}

impl ResultStore {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).context("Failed to create output directory")?;
        Ok(Self { output_dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", key))
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<PathBuf> {
        if self.exists(key) {
            info!("Replacing stored result: {}", key);
        }

        let file_path = self.path_for(key);
        let record = StoredResult {
            key: key.to_string(),
            generated_at: Utc::now(),
            data,
        };

        let json = serde_json::to_string_pretty(&record).with_context(|| store_context("serialize", key))?;
        fs::write(&file_path, json).with_context(|| store_context("write", key))?;

        info!("Saved result to {}", file_path.display());
        Ok(file_path)
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<StoredResult<T>>> {
        let file_path = self.path_for(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&file_path).with_context(|| store_context("read", key))?;
        let record = serde_json::from_str(&json).with_context(|| store_context("deserialize", key))?;
        Ok(Some(record))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}

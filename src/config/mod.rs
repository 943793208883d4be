pub mod settings;

use std::path::PathBuf;

pub use settings::*;

const OUTPUT_DIR_VAR: &str = "RECSYS_LAB_OUTPUT_DIR";
const DEFAULT_OUTPUT_DIR: &str = "results";

/// Directory where run results are stored
pub fn output_dir() -> PathBuf {
    std::env::var(OUTPUT_DIR_VAR)
        .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
        .into()
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use regex::Regex;

use crate::domain::{InMemoryDataset, Rating, RatingsDataset};
use crate::errors::load_context;

const LINE_PATTERN: &str =
    r"^\s*(-?\d+)\s*(?:::|[,;\t]|\s)\s*(-?\d+)\s*(?:::|[,;\t]|\s)\s*(-?\d+(?:\.\d+)?)(?:\s*(?:::|[,;\t]|\s)\s*\d+)?\s*$";

/// Reads `user<sep>item<sep>rating[<sep>timestamp]` text files.
///
/// Accepted separators are `,`, `;`, tab, `::` and plain whitespace. Blank
/// lines and `#` comments are skipped, as is a header in front of the first
/// rating.
pub struct RatingsFileLoader {
    line_regex: Regex,
}

impl RatingsFileLoader {
    pub fn new() -> Result<Self> {
        let line_regex = Regex::new(LINE_PATTERN).context("Failed to compile ratings line regex")?;
        Ok(Self { line_regex })
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<InMemoryDataset> {
        let path = path.as_ref();
        info!("Loading ratings from {}", path.display());

        let content = fs::read_to_string(path).with_context(|| load_context(&path.display().to_string()))?;
        let dataset = self
            .parse(&content)
            .with_context(|| load_context(&path.display().to_string()))?;

        info!(
            "  → {} ratings from {} users",
            dataset.num_ratings(),
            dataset.all_users().len()
        );
        Ok(dataset)
    }

    pub fn parse(&self, content: &str) -> Result<InMemoryDataset> {
        let mut dataset = InMemoryDataset::new();
        let mut seen_rating = false;

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match self.parse_line(trimmed)? {
                Some(rating) => {
                    dataset.insert(rating);
                    seen_rating = true;
                }
                None if !seen_rating => debug!("Skipping header line {}: {}", index + 1, trimmed),
                None => bail!("Malformed rating on line {}: {}", index + 1, trimmed),
            }
        }

        Ok(dataset)
    }

    fn parse_line(&self, line: &str) -> Result<Option<Rating>> {
        let Some(captures) = self.line_regex.captures(line) else {
            return Ok(None);
        };

        let user_id = captures[1].parse().context("Invalid user id")?;
        let item_id = captures[2].parse().context("Invalid item id")?;
        let value = captures[3].parse().context("Invalid rating value")?;
        Ok(Some(Rating::new(user_id, item_id, value)))
    }
}

/// Convenience wrapper for a one-off load
pub fn load_ratings_file<P: AsRef<Path>>(path: P) -> Result<InMemoryDataset> {
    RatingsFileLoader::new()?.load(path)
}

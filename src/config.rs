//! Pipeline configuration
//!
//! Defaults reproduce the reference setup (200 trees, 80/20 split, seed 42,
//! top 10). Environment variables override them:
//!
//! | Variable       | Field           |
//! |----------------|-----------------|
//! | `F1_DATA`      | `data_path`     |
//! | `F1_TREES`     | `n_trees`       |
//! | `F1_TEST_SIZE` | `test_fraction` |
//! | `F1_SEED`      | `seed`          |
//! | `F1_TOP_N`     | `top_n`         |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default corpus file
pub const DEFAULT_DATA_PATH: &str = "F1_Data.csv";

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0}")]
    OutOfRange(String),
}

/// Training and prediction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Historical results CSV
    pub data_path: PathBuf,
    /// Number of trees in the forest
    pub n_trees: u16,
    /// Held-out fraction for evaluation
    pub test_fraction: f64,
    /// Seed for the split and the forest
    pub seed: u64,
    /// Maximum drivers per prediction
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            n_trees: 200,
            test_fraction: 0.2,
            seed: 42,
            top_n: 10,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("F1_DATA") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(v) = parse_var(&lookup, "F1_TREES")? {
            config.n_trees = v;
        }
        if let Some(v) = parse_var(&lookup, "F1_TEST_SIZE")? {
            config.test_fraction = v;
        }
        if let Some(v) = parse_var(&lookup, "F1_SEED")? {
            config.seed = v;
        }
        if let Some(v) = parse_var(&lookup, "F1_TOP_N")? {
            config.top_n = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::OutOfRange("n_trees must be at least 1".to_string()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::OutOfRange(format!(
                "test_fraction must be between 0 and 1 (exclusive), got {}",
                self.test_fraction
            )));
        }
        if self.top_n == 0 {
            return Err(ConfigError::OutOfRange("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

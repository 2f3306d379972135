use crate::error::{PipelineError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    pub pwned: PwnedConfig,
    pub iib: IibConfig,
}

#[derive(Debug, Deserialize)]
pub struct PwnedConfig {
    pub url: String,
    pub expected_records: usize,
}

#[derive(Debug, Deserialize)]
pub struct IibConfig {
    pub csv_path: String,
    pub expected_records: usize,
}

/// Bounds applied while cleaning: the examined date window (max exclusive)
/// and the ceiling a single fetch may not exceed.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub max_records: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_date: NaiveDate::from_ymd_opt(2009, 1, 1).expect("valid window start"),
            max_date: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid window end"),
            max_records: 5000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

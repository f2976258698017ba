use crate::error::{CollectorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub airvisual: AirVisualConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AirVisualConfig {
    pub api_key: String,
    pub base_url: String,
    pub delay_ms: u64,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub data_dir: String,
    pub csv_file: String,
    pub db_file: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CollectorError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    pub fn csv_path(&self) -> PathBuf {
        Path::new(&self.output.data_dir).join(&self.output.csv_file)
    }

    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.output.data_dir).join(&self.output.db_file)
    }
}

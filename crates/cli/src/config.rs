//! Configuration management for the CLI
//!
//! Values come from an optional config file, then `WM_`-prefixed
//! environment variables, then command-line overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use usage_lib::PipelineConfig;

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WmConfig {
    /// CSV file with hourly readings
    pub input: PathBuf,
    /// Samples counted as "today"
    pub window: usize,
    pub critical_leak_count: usize,
    pub recent_leaks: usize,
    pub contamination: f64,
    pub seed: u64,
    pub n_trees: usize,
    pub peak_threshold: f64,
}

impl Default for WmConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            input: PathBuf::from("water_data.csv"),
            window: pipeline.window,
            critical_leak_count: pipeline.critical_leak_count,
            recent_leaks: pipeline.recent_leaks,
            contamination: pipeline.contamination,
            seed: pipeline.seed,
            n_trees: pipeline.n_trees,
            peak_threshold: pipeline.peak_threshold,
        }
    }
}

impl WmConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path, `wm.{toml,json,yaml}` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("wm").required(false)),
        };

        let config = builder
            .add_source(config::Environment::with_prefix("WM").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            window: self.window,
            critical_leak_count: self.critical_leak_count,
            recent_leaks: self.recent_leaks,
            contamination: self.contamination,
            seed: self.seed,
            n_trees: self.n_trees,
            peak_threshold: self.peak_threshold,
        }
    }
}

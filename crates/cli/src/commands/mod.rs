//! CLI command implementations

pub mod anomalies;
pub mod forecast;
pub mod generate;
pub mod leaks;
pub mod recommendations;
pub mod report;

use anyhow::{Context, Result};
use usage_lib::SeriesStore;

use crate::config::WmConfig;
use crate::loader::load_series;
use crate::output::OutputFormat;

/// Settings shared by every analytics command
pub struct CommandContext {
    pub config: WmConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: WmConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Load the configured input file
    pub fn load_series(&self) -> Result<SeriesStore> {
        let series = load_series(&self.config.input)
            .with_context(|| format!("Cannot load {}", self.source_name()))?;
        tracing::debug!(
            event = "series_loaded",
            source = %self.config.input.display(),
            samples = series.len(),
            "Loaded usage series"
        );
        Ok(series)
    }

    pub fn source_name(&self) -> String {
        self.config.input.display().to_string()
    }
}

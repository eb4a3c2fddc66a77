//! Synthetic hourly water usage data
//!
//! Usage is drawn uniformly from 80-150 L per hour. Each hour has a small
//! chance of a leak whose volume (30-80 L) is added on top of the usage.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Synthetic data settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub days: u32,
    /// Fixed seed for reproducible files; entropy when absent
    pub seed: Option<u64>,
    pub leak_probability: f64,
    pub usage_range: (u32, u32),
    pub leak_range: (u32, u32),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: 7,
            seed: None,
            leak_probability: 0.05,
            usage_range: (80, 150),
            leak_range: (30, 80),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub timestamp: String,
    pub water_usage: u32,
    pub leak: u32,
}

/// Generate hourly records starting at `start`
pub fn generate(config: &GeneratorConfig, start: NaiveDateTime) -> Vec<UsageRecord> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let hours = config.days as i64 * 24;
    (0..hours)
        .map(|i| {
            let time = start + Duration::hours(i);
            let mut usage = rng.gen_range(config.usage_range.0..=config.usage_range.1);

            let mut leak = 0;
            if rng.gen::<f64>() < config.leak_probability {
                leak = rng.gen_range(config.leak_range.0..=config.leak_range.1);
                usage += leak;
            }

            UsageRecord {
                timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
                water_usage: usage,
                leak,
            }
        })
        .collect()
}

/// Generate `config.days` of data ending now and write it as CSV
pub fn write_csv(config: &GeneratorConfig, path: &Path) -> Result<usize> {
    let start = Local::now().naive_local() - Duration::days(config.days as i64);
    let records = generate(config, start);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in &records {
        writer
            .serialize(record)
            .context("Failed to write CSV record")?;
    }
    writer.flush().context("Failed to flush CSV file")?;

    Ok(records.len())
}

//! CSV loading for hourly water readings
//!
//! Expected header: `timestamp,water_usage,leak`.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use usage_lib::{AnalyticsError, Sample, SeriesStore};

/// Timestamp layouts accepted in the `timestamp` column
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found. Run `wm generate` first.", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: unrecognized timestamp '{value}'")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: AnalyticsError,
    },
}

#[derive(Debug, Deserialize)]
struct UsageRow {
    timestamp: String,
    water_usage: f64,
    leak: f64,
}

/// Load a series from a CSV file
pub fn load_series(path: &Path) -> Result<SeriesStore, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut series = SeriesStore::new();
    for (i, result) in reader.deserialize::<UsageRow>().enumerate() {
        // Header is line 1
        let row = i + 2;
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| LoadError::Timestamp {
            row,
            value: record.timestamp.clone(),
        })?;

        Sample::new(timestamp, record.water_usage, record.leak)
            .and_then(|sample| series.push(sample))
            .map_err(|source| LoadError::InvalidRow { row, source })?;
    }

    Ok(series)
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

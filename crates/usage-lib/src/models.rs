//! Core data models for the usage analytics pipeline

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly water meter reading
///
/// Amounts are always finite and non-negative: the only ways to obtain a
/// sample are [`Sample::new`] and deserialization, which goes through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSample")]
pub struct Sample {
    timestamp: NaiveDateTime,
    /// Liters consumed during the interval, leak included
    usage: f64,
    /// Liters attributed to a leak (0 = no leak)
    leak: f64,
}

#[derive(Deserialize)]
struct RawSample {
    timestamp: NaiveDateTime,
    usage: f64,
    leak: f64,
}

impl TryFrom<RawSample> for Sample {
    type Error = AnalyticsError;

    fn try_from(raw: RawSample) -> Result<Self> {
        Sample::new(raw.timestamp, raw.usage, raw.leak)
    }
}

impl Sample {
    /// Create a sample, rejecting negative or non-finite amounts
    pub fn new(timestamp: NaiveDateTime, usage: f64, leak: f64) -> Result<Self> {
        check_amount("usage", usage)?;
        check_amount("leak", leak)?;
        Ok(Self {
            timestamp,
            usage,
            leak,
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn usage(&self) -> f64 {
        self.usage
    }

    pub fn leak(&self) -> f64 {
        self.leak
    }

    pub fn is_leak(&self) -> bool {
        self.leak > 0.0
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalyticsError::InvalidSample { field, value });
    }
    Ok(())
}

/// Chronologically ordered, append-only sample series
///
/// Insertion order is chronological order: a sample may share its
/// predecessor's timestamp but never precede it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStore {
    samples: Vec<Sample>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from samples already in chronological order
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Result<Self> {
        let mut store = Self::new();
        for sample in samples {
            store.push(sample)?;
        }
        Ok(store)
    }

    /// Append a sample at the end of the series
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                return Err(AnalyticsError::OutOfOrder {
                    index: self.samples.len(),
                });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Usage values in series order
    pub fn usage_values(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::usage).collect()
    }

    /// The last `n` samples (all of them if fewer exist)
    pub fn tail(&self, n: usize) -> &[Sample] {
        let start = self.samples.len().saturating_sub(n);
        &self.samples[start..]
    }
}

impl<'a> IntoIterator for &'a SeriesStore {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// A sample with a nonzero leak amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeakEvent {
    /// Position of the originating sample in the series
    pub index: usize,
    pub timestamp: NaiveDateTime,
    /// Liters lost to the leak
    pub extra_usage: f64,
}

/// One-step-ahead demand forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Index the prediction is made for (series length)
    pub horizon_index: usize,
    pub predicted_usage: f64,
    /// Liters per sample
    pub slope: f64,
    pub intercept: f64,
}

/// Outlier verdict for one sample, aligned with series order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub index: usize,
    /// Isolation score in (0, 1]; higher is more anomalous
    pub score: f64,
    pub is_anomaly: bool,
}

/// Overall system health derived from the leak count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Stable,
    Critical,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Stable => write!(f, "Stable"),
            SystemStatus::Critical => write!(f, "Critical"),
        }
    }
}

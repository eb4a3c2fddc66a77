//! Windowed usage aggregates
//!
//! Sums and counts over the most recent samples of a series. All
//! aggregates degrade to zero on an empty series instead of failing.

use crate::error::{AnalyticsError, Result};
use crate::models::{Sample, SeriesStore, SystemStatus};
use serde::{Deserialize, Serialize};

/// Hourly samples in a day
pub const DEFAULT_WINDOW: usize = 24;

/// Leak count at which the system is reported as critical
pub const DEFAULT_CRITICAL_LEAK_COUNT: usize = 3;

/// Sum of usage over the last `window` samples
///
/// Uses all samples when fewer than `window` exist.
pub fn today_usage(series: &SeriesStore, window: usize) -> Result<f64> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }
    Ok(series.tail(window).iter().map(Sample::usage).sum())
}

/// Number of samples carrying a nonzero leak amount
pub fn leak_count(series: &SeriesStore) -> usize {
    series.iter().filter(|s| s.is_leak()).count()
}

/// Stable while leaks stay below `critical_threshold`
pub fn system_status(leak_count: usize, critical_threshold: usize) -> SystemStatus {
    if leak_count < critical_threshold {
        SystemStatus::Stable
    } else {
        SystemStatus::Critical
    }
}

/// Computes the overview figures for a series
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    /// Samples making up "today"
    pub window: usize,
    /// Leak count that flips the status to critical
    pub critical_leak_count: usize,
}

impl MetricsAggregator {
    pub fn new(window: usize, critical_leak_count: usize) -> Self {
        Self {
            window,
            critical_leak_count,
        }
    }

    pub fn summarize(&self, series: &SeriesStore) -> Result<UsageSummary> {
        let today_usage = today_usage(series, self.window)?;
        let leak_count = leak_count(series);

        Ok(UsageSummary {
            today_usage,
            leak_count,
            status: system_status(leak_count, self.critical_leak_count),
        })
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_CRITICAL_LEAK_COUNT)
    }
}

/// Overview figures for the dashboard header
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub today_usage: f64,
    pub leak_count: usize,
    pub status: SystemStatus,
}

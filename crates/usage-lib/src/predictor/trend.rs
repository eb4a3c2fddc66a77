//! Linear trend forecasting
//!
//! Fits an ordinary least-squares line through (sample index, usage) and
//! extrapolates it one step past the end of the series. The line is refit
//! from scratch on every call.

use super::Forecaster;
use crate::error::{AnalyticsError, Result};
use crate::models::{ForecastResult, SeriesStore};

/// Minimum samples required to fit a line
pub const MIN_SAMPLES: usize = 2;

/// One-step-ahead forecaster over the index-vs-usage trend
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fit the trend and predict usage at index `series.len()`
    pub fn fit_and_predict(&self, series: &SeriesStore) -> Result<ForecastResult> {
        if series.len() < MIN_SAMPLES {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_SAMPLES,
                actual: series.len(),
            });
        }

        let values = series.usage_values();
        let (slope, intercept) = fit_line(&values);
        let horizon_index = values.len();

        Ok(ForecastResult {
            horizon_index,
            predicted_usage: intercept + slope * horizon_index as f64,
            slope,
            intercept,
        })
    }
}

impl Forecaster for ForecastEngine {
    fn forecast(&self, series: &SeriesStore) -> Result<ForecastResult> {
        self.fit_and_predict(series)
    }

    fn name(&self) -> &str {
        "linear_trend"
    }
}

/// Least-squares (slope, intercept) with x = 0, 1, 2, ...
fn fit_line(values: &[f64]) -> (f64, f64) {
    let first = values.first().copied().unwrap_or(0.0);
    if values.iter().all(|v| *v == first) {
        return (0.0, first);
    }

    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    if sxx.abs() < f64::EPSILON {
        return (0.0, mean_y);
    }

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

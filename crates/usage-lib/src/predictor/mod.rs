//! Demand forecasting

mod trend;

pub use trend::{ForecastEngine, MIN_SAMPLES};

use crate::error::Result;
use crate::models::{ForecastResult, SeriesStore};

/// Trait for forecasting implementations
pub trait Forecaster: Send + Sync {
    /// Predict the next sample's usage from the series
    fn forecast(&self, series: &SeriesStore) -> Result<ForecastResult>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

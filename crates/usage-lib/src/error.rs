//! Error types for the analytics core

use thiserror::Error;

/// Errors returned by analytics operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Aggregation window must cover at least one sample
    #[error("invalid aggregation window: {0} (must be at least 1)")]
    InvalidWindow(usize),

    /// Too few samples for the requested model
    #[error("insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Operation requested over a series with no samples
    #[error("series is empty")]
    EmptySeries,

    /// Contamination outside (0, 0.5]
    #[error("invalid contamination {0}: must be in (0, 0.5]")]
    InvalidContamination(f64),

    /// Usage or leak amount is negative or not finite
    #[error("invalid sample: {field} = {value}")]
    InvalidSample { field: &'static str, value: f64 },

    /// Sample timestamp precedes the previous sample
    #[error("sample {index} is earlier than the sample before it")]
    OutOfOrder { index: usize },
}

impl AnalyticsError {
    /// Whether the error only reflects a too-short series
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InsufficientData { .. } | AnalyticsError::EmptySeries
        )
    }
}

/// Result alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

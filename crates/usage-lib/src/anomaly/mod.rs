//! Anomaly detection for water usage
//!
//! This module provides detection for:
//! - Leaks (samples carrying a nonzero leak amount)
//! - Usage outliers (isolation forest over usage values)

mod leak_detector;
mod outlier_detector;

pub use leak_detector::{LeakDetector, DEFAULT_RECENT_LEAKS};
pub use outlier_detector::{
    flag_anomalies, AnomalyDetector, DEFAULT_CONTAMINATION, DEFAULT_MAX_SAMPLES, DEFAULT_SEED,
    DEFAULT_TREES, MIN_SAMPLES_FOR_DETECTION,
};

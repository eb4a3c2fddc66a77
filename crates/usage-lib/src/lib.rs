//! Water usage analytics library
//!
//! This crate provides the analytics core behind the water dashboard:
//! - Windowed usage aggregates and system status
//! - Leak event detection
//! - One-step linear trend forecasting
//! - Isolation-forest usage outlier flags
//! - Rule-based recommendations
//!
//! Every component is a pure function of an immutable [`SeriesStore`];
//! loading and rendering belong to the caller.

pub mod aggregate;
pub mod anomaly;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod predictor;
pub mod recommendation;

#[cfg(test)]
mod test_support;

pub use aggregate::{leak_count, system_status, today_usage, MetricsAggregator, UsageSummary};
pub use anomaly::{flag_anomalies, AnomalyDetector, LeakDetector};
pub use error::{AnalyticsError, Result};
pub use models::*;
pub use observability::{AnalyticsMetrics, StructuredLogger};
pub use pipeline::{AnalyticsReport, AnomalySection, FlaggedSample, PipelineConfig, UsageAnalytics};
pub use predictor::{ForecastEngine, Forecaster};
pub use recommendation::{recommend, RecommendationEngine};

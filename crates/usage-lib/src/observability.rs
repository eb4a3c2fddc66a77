//! Observability infrastructure for the analytics pipeline
//!
//! Provides:
//! - Prometheus metrics (pass latency, samples analyzed, leaks, anomalies, failures)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for analytics pass latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AnalyticsMetricsInner> = OnceLock::new();

struct AnalyticsMetricsInner {
    pass_latency_seconds: Histogram,
    passes_total: IntCounter,
    samples_analyzed: IntGauge,
    leaks_detected: IntGauge,
    anomalies_flagged: IntGauge,
    component_failures: IntCounterVec,
}

impl AnalyticsMetricsInner {
    fn new() -> Self {
        Self {
            pass_latency_seconds: register_histogram!(
                "water_analytics_pass_latency_seconds",
                "Time spent running one full analytics pass",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register pass_latency_seconds"),

            passes_total: register_int_counter!(
                "water_analytics_passes_total",
                "Total number of analytics passes run"
            )
            .expect("Failed to register passes_total"),

            samples_analyzed: register_int_gauge!(
                "water_analytics_samples_analyzed",
                "Number of samples in the most recently analyzed series"
            )
            .expect("Failed to register samples_analyzed"),

            leaks_detected: register_int_gauge!(
                "water_analytics_leaks_detected",
                "Leak events found in the most recently analyzed series"
            )
            .expect("Failed to register leaks_detected"),

            anomalies_flagged: register_int_gauge!(
                "water_analytics_anomalies_flagged",
                "Usage outliers flagged in the most recently analyzed series"
            )
            .expect("Failed to register anomalies_flagged"),

            component_failures: register_int_counter_vec!(
                "water_analytics_component_failures_total",
                "Analytics components that could not produce a result",
                &["component"]
            )
            .expect("Failed to register component_failures"),
        }
    }
}

/// Analytics metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct AnalyticsMetrics {
    _private: (),
}

impl Default for AnalyticsMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AnalyticsMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AnalyticsMetricsInner {
        GLOBAL_METRICS.get_or_init(AnalyticsMetricsInner::new)
    }

    /// Record a completed pass
    pub fn observe_pass(&self, duration_secs: f64, samples: usize) {
        self.inner().pass_latency_seconds.observe(duration_secs);
        self.inner().passes_total.inc();
        self.inner().samples_analyzed.set(samples as i64);
    }

    pub fn set_leaks_detected(&self, count: usize) {
        self.inner().leaks_detected.set(count as i64);
    }

    pub fn set_anomalies_flagged(&self, count: usize) {
        self.inner().anomalies_flagged.set(count as i64);
    }

    pub fn inc_component_failure(&self, component: &str) {
        self.inner()
            .component_failures
            .with_label_values(&[component])
            .inc();
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn encode_text(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Structured logger for analytics events
///
/// Tags every event with the data source so passes over different files
/// can be told apart in aggregated logs.
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn log_pass_started(&self, samples: usize) {
        debug!(
            event = "analytics_started",
            source = %self.source,
            samples = samples,
            "Starting analytics pass"
        );
    }

    /// Log the overview figures of a pass
    pub fn log_summary(&self, today_usage: f64, leak_count: usize, status: &str) {
        info!(
            event = "usage_summary",
            source = %self.source,
            today_usage_liters = today_usage,
            leak_count = leak_count,
            status = %status,
            "Computed usage summary"
        );
    }

    /// Log a leak event
    pub fn log_leak(&self, timestamp: &str, extra_usage: f64) {
        warn!(
            event = "leak_detected",
            source = %self.source,
            timestamp = %timestamp,
            extra_usage_liters = extra_usage,
            "Leak detected"
        );
    }

    pub fn log_forecast(&self, horizon_index: usize, predicted_usage: f64, slope: f64) {
        info!(
            event = "forecast_generated",
            source = %self.source,
            horizon_index = horizon_index,
            predicted_usage_liters = predicted_usage,
            slope = slope,
            "Generated demand forecast"
        );
    }

    pub fn log_anomalies(&self, flagged: usize, total: usize, contamination: f64) {
        if flagged > 0 {
            warn!(
                event = "anomalies_detected",
                source = %self.source,
                flagged = flagged,
                total = total,
                contamination = contamination,
                "Abnormal consumption points found"
            );
        } else {
            info!(
                event = "anomalies_detected",
                source = %self.source,
                flagged = 0,
                total = total,
                contamination = contamination,
                "No abnormal usage detected"
            );
        }
    }

    /// Log a component that could not produce a result
    pub fn log_component_skipped(&self, component: &str, reason: &str) {
        warn!(
            event = "component_skipped",
            source = %self.source,
            component = %component,
            reason = %reason,
            "Analytics component skipped"
        );
    }

    pub fn log_pass_completed(&self, duration_secs: f64, recommendations: usize) {
        info!(
            event = "analytics_completed",
            source = %self.source,
            duration_secs = duration_secs,
            recommendations = recommendations,
            "Analytics pass completed"
        );
    }
}

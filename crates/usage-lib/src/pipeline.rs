//! Full analytics pass over a series
//!
//! Runs every component in dashboard order: overview aggregates, leak
//! events, forecast, outliers and finally recommendations. Components that
//! only lack data are reported as warnings; configuration errors abort the
//! pass.

use crate::aggregate::{MetricsAggregator, UsageSummary, DEFAULT_CRITICAL_LEAK_COUNT, DEFAULT_WINDOW};
use crate::anomaly::{
    AnomalyDetector, LeakDetector, DEFAULT_CONTAMINATION, DEFAULT_RECENT_LEAKS, DEFAULT_SEED,
    DEFAULT_TREES,
};
use crate::error::{AnalyticsError, Result};
use crate::models::{ForecastResult, LeakEvent, Sample, SeriesStore};
use crate::observability::{AnalyticsMetrics, StructuredLogger};
use crate::predictor::{ForecastEngine, Forecaster};
use crate::recommendation::{RecommendationEngine, DEFAULT_PEAK_THRESHOLD};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Tunables for one analytics pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples summed for "today's usage"
    pub window: usize,
    pub critical_leak_count: usize,
    /// Leak events kept as latest alerts
    pub recent_leaks: usize,
    pub contamination: f64,
    pub seed: u64,
    pub n_trees: usize,
    pub peak_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            critical_leak_count: DEFAULT_CRITICAL_LEAK_COUNT,
            recent_leaks: DEFAULT_RECENT_LEAKS,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
            n_trees: DEFAULT_TREES,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
        }
    }
}

/// A sample flagged as a usage outlier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlaggedSample {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub usage: f64,
    pub leak: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySection {
    pub contamination: f64,
    pub anomaly_count: usize,
    /// Flagged samples in chronological order
    pub flagged: Vec<FlaggedSample>,
}

/// Everything the presentation layer needs from one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub source: String,
    pub sample_count: usize,
    pub period_start: Option<NaiveDateTime>,
    pub period_end: Option<NaiveDateTime>,
    pub summary: UsageSummary,
    pub total_leak_loss: f64,
    /// Latest leak events, most recent last
    pub recent_leaks: Vec<LeakEvent>,
    pub forecast: Option<ForecastResult>,
    pub anomalies: Option<AnomalySection>,
    pub recommendations: Vec<String>,
    /// Sections that were skipped and why
    pub warnings: Vec<String>,
}

/// Runs the analytics components over a series
pub struct UsageAnalytics {
    config: PipelineConfig,
    aggregator: MetricsAggregator,
    leak_detector: LeakDetector,
    forecaster: Box<dyn Forecaster>,
    anomaly_detector: AnomalyDetector,
    recommender: RecommendationEngine,
    logger: StructuredLogger,
    metrics: AnalyticsMetrics,
}

impl UsageAnalytics {
    pub fn new(config: PipelineConfig, source: impl Into<String>) -> Self {
        Self {
            aggregator: MetricsAggregator::new(config.window, config.critical_leak_count),
            leak_detector: LeakDetector::new(),
            forecaster: Box::new(ForecastEngine::new()),
            anomaly_detector: AnomalyDetector::new(config.contamination)
                .with_seed(config.seed)
                .with_trees(config.n_trees),
            recommender: RecommendationEngine::new(config.peak_threshold),
            logger: StructuredLogger::new(source),
            metrics: AnalyticsMetrics::new(),
            config,
        }
    }

    pub fn metrics(&self) -> &AnalyticsMetrics {
        &self.metrics
    }

    /// Run a full pass; fails on an empty series
    pub fn run(&self, series: &SeriesStore) -> Result<AnalyticsReport> {
        if series.is_empty() {
            return Err(AnalyticsError::EmptySeries);
        }

        let started = Instant::now();
        self.logger.log_pass_started(series.len());
        let mut warnings = Vec::new();

        let summary = self.aggregator.summarize(series)?;
        self.logger.log_summary(
            summary.today_usage,
            summary.leak_count,
            &summary.status.to_string(),
        );

        let recent_leaks = self.leak_detector.recent(series, self.config.recent_leaks);
        for leak in &recent_leaks {
            self.logger
                .log_leak(&leak.timestamp.to_string(), leak.extra_usage);
        }
        self.metrics.set_leaks_detected(summary.leak_count);

        let forecast = match self.forecaster.forecast(series) {
            Ok(forecast) => {
                self.logger.log_forecast(
                    forecast.horizon_index,
                    forecast.predicted_usage,
                    forecast.slope,
                );
                Some(forecast)
            }
            Err(e) if e.is_insufficient_data() => {
                self.skip(self.forecaster.name(), &e, &mut warnings);
                None
            }
            Err(e) => return Err(e),
        };

        let anomalies = match self.anomaly_detector.flag_anomalies(series) {
            Ok(flags) => {
                let flagged: Vec<FlaggedSample> = flags
                    .iter()
                    .filter(|f| f.is_anomaly)
                    .filter_map(|f| {
                        series.samples().get(f.index).map(|s| FlaggedSample {
                            index: f.index,
                            timestamp: s.timestamp(),
                            usage: s.usage(),
                            leak: s.leak(),
                            score: f.score,
                        })
                    })
                    .collect();
                self.logger.log_anomalies(
                    flagged.len(),
                    series.len(),
                    self.anomaly_detector.contamination,
                );
                self.metrics.set_anomalies_flagged(flagged.len());
                Some(AnomalySection {
                    contamination: self.anomaly_detector.contamination,
                    anomaly_count: flagged.len(),
                    flagged,
                })
            }
            Err(e) if e.is_insufficient_data() => {
                self.skip("isolation_forest", &e, &mut warnings);
                None
            }
            Err(e) => return Err(e),
        };

        let recommendations = match &forecast {
            Some(f) => self
                .recommender
                .recommend(summary.leak_count, f.predicted_usage),
            None => self.recommender.recommend_without_forecast(summary.leak_count),
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.observe_pass(elapsed, series.len());
        self.logger
            .log_pass_completed(elapsed, recommendations.len());

        Ok(AnalyticsReport {
            source: self.logger.source().to_string(),
            sample_count: series.len(),
            period_start: series.first().map(Sample::timestamp),
            period_end: series.last().map(Sample::timestamp),
            summary,
            total_leak_loss: self.leak_detector.total_loss(series),
            recent_leaks,
            forecast,
            anomalies,
            recommendations,
            warnings,
        })
    }

    fn skip(&self, component: &str, error: &AnalyticsError, warnings: &mut Vec<String>) {
        self.logger
            .log_component_skipped(component, &error.to_string());
        self.metrics.inc_component_failure(component);
        warnings.push(format!("{}: {}", component, error));
    }
}

impl Default for UsageAnalytics {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), "memory")
    }
}

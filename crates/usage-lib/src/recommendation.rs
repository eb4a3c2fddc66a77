//! Advisory rules derived from leak and forecast results

/// Forecast usage (liters) above which pressure reduction is advised
pub const DEFAULT_PEAK_THRESHOLD: f64 = 140.0;

pub const DISPATCH_MAINTENANCE: &str = "Dispatch maintenance team";
pub const REDUCE_PEAK_PRESSURE: &str = "Reduce pressure during peak hours";
pub const ENCOURAGE_CONSERVATION: &str = "Encourage water conservation awareness";

/// Fixed rule table turning analytics output into advisories
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    pub peak_threshold: f64,
}

impl RecommendationEngine {
    pub fn new(peak_threshold: f64) -> Self {
        Self { peak_threshold }
    }

    /// Advisories in rule order; the conservation line is always last
    pub fn recommend(&self, leak_count: usize, predicted_usage: f64) -> Vec<String> {
        self.evaluate(leak_count, Some(predicted_usage))
    }

    /// Advisories when no forecast could be produced
    pub fn recommend_without_forecast(&self, leak_count: usize) -> Vec<String> {
        self.evaluate(leak_count, None)
    }

    fn evaluate(&self, leak_count: usize, predicted_usage: Option<f64>) -> Vec<String> {
        let mut advisories = Vec::with_capacity(3);
        if leak_count > 0 {
            advisories.push(DISPATCH_MAINTENANCE.to_string());
        }
        if predicted_usage.is_some_and(|p| p > self.peak_threshold) {
            advisories.push(REDUCE_PEAK_PRESSURE.to_string());
        }
        advisories.push(ENCOURAGE_CONSERVATION.to_string());
        advisories
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PEAK_THRESHOLD)
    }
}

/// Advisories with the default peak threshold
pub fn recommend(leak_count: usize, predicted_usage: f64) -> Vec<String> {
    RecommendationEngine::default().recommend(leak_count, predicted_usage)
}

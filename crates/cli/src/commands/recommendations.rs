//! Recommendation command

use anyhow::Result;
use serde::Serialize;
use usage_lib::{leak_count, ForecastEngine, RecommendationEngine};

use super::CommandContext;
use crate::output::{print_json, print_warning, OutputFormat};

#[derive(Serialize)]
struct RecommendationOutput {
    leak_count: usize,
    predicted_usage: Option<f64>,
    peak_threshold: f64,
    recommendations: Vec<String>,
}

/// Print advisories derived from leaks and the demand forecast
pub fn show_recommendations(ctx: &CommandContext) -> Result<()> {
    let series = ctx.load_series()?;
    let leaks = leak_count(&series);
    let engine = RecommendationEngine::new(ctx.config.peak_threshold);

    let predicted_usage = match ForecastEngine::new().fit_and_predict(&series) {
        Ok(forecast) => Some(forecast.predicted_usage),
        Err(e) if e.is_insufficient_data() => None,
        Err(e) => return Err(e.into()),
    };
    let recommendations = match predicted_usage {
        Some(p) => engine.recommend(leaks, p),
        None => engine.recommend_without_forecast(leaks),
    };

    match ctx.format {
        OutputFormat::Json => print_json(&RecommendationOutput {
            leak_count: leaks,
            predicted_usage,
            peak_threshold: engine.peak_threshold,
            recommendations,
        })?,
        OutputFormat::Table => {
            if predicted_usage.is_none() {
                print_warning("Not enough readings to forecast demand; peak advice skipped");
            }
            for advisory in &recommendations {
                println!("✔ {}", advisory);
            }
        }
    }

    Ok(())
}

//! Demand forecast command

use anyhow::Result;
use usage_lib::ForecastEngine;

use super::CommandContext;
use crate::output::{format_liters, print_info, print_json, OutputFormat};

/// Fit the usage trend and print the next-hour prediction
pub fn show_forecast(ctx: &CommandContext) -> Result<()> {
    let series = ctx.load_series()?;
    let forecast = ForecastEngine::new().fit_and_predict(&series)?;

    match ctx.format {
        OutputFormat::Json => print_json(&forecast)?,
        OutputFormat::Table => {
            print_info(&format!(
                "Predicted water usage for next hour: {:.0} Liters",
                forecast.predicted_usage
            ));
            println!(
                "Trend: {:+.3} L per hour from {} at hour 0 ({} readings)",
                forecast.slope,
                format_liters(forecast.intercept),
                forecast.horizon_index
            );
        }
    }

    Ok(())
}

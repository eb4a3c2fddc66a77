//! Full dashboard report

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;
use usage_lib::{AnalyticsReport, SeriesStore, UsageAnalytics};

use super::CommandContext;
use crate::output::{
    color_status, format_liters, format_score, format_timestamp, print_alert, print_heading,
    print_info, print_json, print_success, print_table, print_warning, OutputFormat,
};

/// Flagged samples listed in the anomaly table
const ANOMALY_ROWS: usize = 5;

#[derive(Tabled)]
struct OverviewRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// One day of the usage trend
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DailyTrendRow {
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[tabled(rename = "Total", display_with = "display_liters")]
    pub total: f64,
    #[tabled(rename = "Peak Hour", display_with = "display_liters")]
    pub peak: f64,
    #[tabled(rename = "Leaks")]
    pub leaks: usize,
}

#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Usage")]
    usage: String,
    #[tabled(rename = "Leak")]
    leak: String,
    #[tabled(rename = "Score")]
    score: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a AnalyticsReport,
    daily_trend: Vec<DailyTrendRow>,
}

fn display_liters(liters: &f64) -> String {
    format_liters(*liters)
}

/// Per-day totals for the trend section
pub fn daily_trend(series: &SeriesStore) -> Vec<DailyTrendRow> {
    let mut days: BTreeMap<NaiveDate, DailyTrendRow> = BTreeMap::new();
    for sample in series {
        let date = sample.timestamp().date();
        let row = days.entry(date).or_insert(DailyTrendRow {
            date,
            total: 0.0,
            peak: 0.0,
            leaks: 0,
        });
        row.total += sample.usage();
        row.peak = row.peak.max(sample.usage());
        if sample.is_leak() {
            row.leaks += 1;
        }
    }
    days.into_values().collect()
}

/// Run the full analytics pass and print every dashboard section
pub fn show_report(ctx: &CommandContext, emit_metrics: bool) -> Result<()> {
    let series = ctx.load_series()?;
    let analytics = UsageAnalytics::new(ctx.config.pipeline(), ctx.source_name());
    let report = analytics.run(&series)?;

    match ctx.format {
        OutputFormat::Json => print_json(&JsonReport {
            report: &report,
            daily_trend: daily_trend(&series),
        })?,
        OutputFormat::Table => print_sections(&report, &series),
    }

    if emit_metrics {
        println!("\n{}", analytics.metrics().encode_text());
    }

    Ok(())
}

fn print_sections(report: &AnalyticsReport, series: &SeriesStore) {
    print_heading("Smart Water Management");
    if let (Some(start), Some(end)) = (report.period_start, report.period_end) {
        print_success(&format!(
            "Loaded {} readings from {} ({} to {})",
            report.sample_count,
            report.source,
            format_timestamp(&start),
            format_timestamp(&end)
        ));
    }

    print_heading("System Overview");
    print_table(vec![
        OverviewRow {
            metric: "Today's Usage".to_string(),
            value: format_liters(report.summary.today_usage),
        },
        OverviewRow {
            metric: "Total Leak Alerts".to_string(),
            value: report.summary.leak_count.to_string(),
        },
        OverviewRow {
            metric: "System Status".to_string(),
            value: color_status(report.summary.status),
        },
    ]);

    print_heading("Water Usage Trend");
    print_table(daily_trend(series));

    print_heading("Leak Detection");
    print_leak_alerts(report);

    print_heading("Demand Forecast");
    match &report.forecast {
        Some(forecast) => print_info(&format!(
            "Predicted water usage for next hour: {:.0} Liters",
            forecast.predicted_usage
        )),
        None => print_warning("Not enough readings to forecast demand"),
    }

    print_heading("Detected Anomalies");
    match &report.anomalies {
        Some(section) if section.anomaly_count > 0 => {
            print_warning(&format!(
                "{} abnormal consumption points found",
                section.anomaly_count
            ));
            let start = section.flagged.len().saturating_sub(ANOMALY_ROWS);
            print_table(
                section.flagged[start..]
                    .iter()
                    .map(|f| AnomalyRow {
                        time: format_timestamp(&f.timestamp),
                        usage: format_liters(f.usage),
                        leak: format_liters(f.leak),
                        score: format_score(f.score),
                    })
                    .collect::<Vec<_>>(),
            );
        }
        Some(_) => print_success("No abnormal usage detected"),
        None => print_warning("Not enough readings to score anomalies"),
    }

    print_heading("Recommendations");
    for advisory in &report.recommendations {
        println!("✔ {}", advisory);
    }

    for warning in &report.warnings {
        print_warning(warning);
    }
}

pub(crate) fn print_leak_alerts(report: &AnalyticsReport) {
    if report.recent_leaks.is_empty() {
        print_success("No leaks detected");
        return;
    }
    for leak in &report.recent_leaks {
        print_alert(&format!(
            "Leak detected at {} | Extra usage: {}",
            format_timestamp(&leak.timestamp),
            format_liters(leak.extra_usage)
        ));
    }
}

//! Leak alert commands

use anyhow::Result;
use tabled::Tabled;
use usage_lib::{leak_count, LeakDetector};

use super::CommandContext;
use crate::output::{
    format_liters, format_timestamp, print_json, print_success, print_table, OutputFormat,
};

#[derive(Tabled)]
struct LeakRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Detected At")]
    timestamp: String,
    #[tabled(rename = "Extra Usage")]
    extra_usage: String,
}

/// Show the latest leak events, oldest first
pub fn show_leaks(ctx: &CommandContext, last: Option<usize>) -> Result<()> {
    let series = ctx.load_series()?;
    let detector = LeakDetector::new();
    let events = detector.recent(&series, last.unwrap_or(ctx.config.recent_leaks));

    match ctx.format {
        OutputFormat::Json => print_json(&events)?,
        OutputFormat::Table => {
            if events.is_empty() {
                print_success("No leaks detected");
                return Ok(());
            }

            let rows: Vec<LeakRow> = events
                .iter()
                .map(|e| LeakRow {
                    index: e.index,
                    timestamp: format_timestamp(&e.timestamp),
                    extra_usage: format_liters(e.extra_usage),
                })
                .collect();
            print_table(rows);
            println!(
                "\nShowing {} of {} leaks, {} lost in total",
                events.len(),
                leak_count(&series),
                format_liters(detector.total_loss(&series))
            );
        }
    }

    Ok(())
}

//! Usage outlier command

use anyhow::Result;
use tabled::Tabled;
use usage_lib::AnomalyDetector;

use super::CommandContext;
use crate::output::{
    format_liters, format_score, format_timestamp, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Usage")]
    usage: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Score every reading and list the flagged ones
pub fn show_anomalies(
    ctx: &CommandContext,
    contamination: Option<f64>,
    seed: Option<u64>,
) -> Result<()> {
    let series = ctx.load_series()?;
    let detector = AnomalyDetector::new(contamination.unwrap_or(ctx.config.contamination))
        .with_seed(seed.unwrap_or(ctx.config.seed))
        .with_trees(ctx.config.n_trees);

    let flags = detector.flag_anomalies(&series)?;
    let flagged: Vec<_> = flags.iter().filter(|f| f.is_anomaly).collect();

    match ctx.format {
        OutputFormat::Json => print_json(&flagged)?,
        OutputFormat::Table => {
            if flagged.is_empty() {
                print_success("No abnormal usage detected");
                return Ok(());
            }

            print_warning(&format!(
                "{} abnormal consumption points found",
                flagged.len()
            ));
            let rows: Vec<AnomalyRow> = flagged
                .iter()
                .filter_map(|f| {
                    series.samples().get(f.index).map(|s| AnomalyRow {
                        index: f.index,
                        time: format_timestamp(&s.timestamp()),
                        usage: format_liters(s.usage()),
                        score: format_score(f.score),
                    })
                })
                .collect();
            print_table(rows);
        }
    }

    Ok(())
}

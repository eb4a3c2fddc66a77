//! Synthetic data command

use anyhow::Result;
use std::path::Path;

use crate::generator::{write_csv, GeneratorConfig};
use crate::output::print_success;

/// Write `days` of hourly readings to `output`
pub fn generate_data(days: u32, seed: Option<u64>, output: &Path) -> Result<()> {
    let config = GeneratorConfig {
        days,
        seed,
        ..GeneratorConfig::default()
    };

    let rows = write_csv(&config, output)?;
    tracing::info!(
        event = "data_generated",
        path = %output.display(),
        rows = rows,
        "Synthetic usage data written"
    );
    print_success(&format!("{} generated ({} hourly readings)", output.display(), rows));

    Ok(())
}

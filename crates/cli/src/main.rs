//! Smart Water Management CLI
//!
//! A terminal dashboard over hourly water usage readings: overview
//! metrics, leak alerts, demand forecast, anomalies and recommendations.

mod commands;
mod config;
mod generator;
mod loader;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{anomalies, forecast, generate, leaks, recommendations, report, CommandContext};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Smart Water Management CLI
#[derive(Parser)]
#[command(name = "wm")]
#[command(author, version, about = "CLI dashboard for Smart Water Management", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, short, env = "WM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic hourly usage CSV
    Generate {
        /// Number of days of hourly readings
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// Output file path
        #[arg(long, short, default_value = "water_data.csv")]
        output: PathBuf,
    },

    /// Show the full dashboard report
    Report {
        /// Input CSV file
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Append Prometheus metrics for the pass
        #[arg(long)]
        metrics: bool,
    },

    /// Show the latest leak alerts
    Leaks {
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Number of latest leaks to show
        #[arg(long)]
        last: Option<usize>,
    },

    /// Predict next-hour water usage
    Forecast {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// List abnormal consumption points
    Anomalies {
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Expected fraction of anomalous readings
        #[arg(long)]
        contamination: Option<f64>,

        /// Seed for the isolation forest
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show recommended actions
    Recommend {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
}

/// Log filter used when `RUST_LOG` is unset
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose))),
        )
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

fn context(cli: &Cli, input: Option<PathBuf>) -> Result<CommandContext> {
    let mut config = config::WmConfig::load(cli.config.as_deref())?;
    if let Some(input) = input {
        config.input = input;
    }
    Ok(CommandContext::new(config, cli.format))
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate { days, seed, output } => {
            generate::generate_data(*days, *seed, output)?;
        }
        Commands::Report { input, metrics } => {
            report::show_report(&context(&cli, input.clone())?, *metrics)?;
        }
        Commands::Leaks { input, last } => {
            leaks::show_leaks(&context(&cli, input.clone())?, *last)?;
        }
        Commands::Forecast { input } => {
            forecast::show_forecast(&context(&cli, input.clone())?)?;
        }
        Commands::Anomalies {
            input,
            contamination,
            seed,
        } => {
            anomalies::show_anomalies(&context(&cli, input.clone())?, *contamination, *seed)?;
        }
        Commands::Recommend { input } => {
            recommendations::show_recommendations(&context(&cli, input.clone())?)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

//! Output formatting utilities

use chrono::NaiveDateTime;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use usage_lib::SystemStatus;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("\n{}", title.cyan().bold());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an alert line on stdout
pub fn print_alert(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format liters, dropping the fraction for whole amounts
pub fn format_liters(liters: f64) -> String {
    if liters.fract() == 0.0 {
        format!("{:.0} L", liters)
    } else {
        format!("{:.1} L", liters)
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an isolation score
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

/// Color system status
pub fn color_status(status: SystemStatus) -> String {
    match status {
        SystemStatus::Stable => status.to_string().green().to_string(),
        SystemStatus::Critical => status.to_string().red().bold().to_string(),
    }
}

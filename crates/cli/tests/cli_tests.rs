//! CLI integration tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn wm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wm"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// 48 hourly readings at 100 L with a 50 L leak at hour 10
fn write_scenario(path: &Path) {
    let mut csv = String::from("timestamp,water_usage,leak\n");
    for hour in 0..48 {
        let (usage, leak) = if hour == 10 { (150, 50) } else { (100, 0) };
        csv.push_str(&format!(
            "2024-03-{:02} {:02}:00:00,{},{}\n",
            1 + hour / 24,
            hour % 24,
            usage,
            leak
        ));
    }
    fs::write(path, csv).unwrap();
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = wm(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Smart Water Management"), "Should show app name");
    for command in ["generate", "report", "leaks", "forecast", "anomalies", "recommend"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = wm(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("wm"), "Should show binary name");
}

/// Test that a missing data file points at the generator
#[test]
fn test_report_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("water_data.csv");
    let output = wm(&["report", "--input", missing.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Report without data should fail");
    assert!(stderr.contains("wm generate"), "Should suggest generating data");
}

/// Test generate followed by a JSON report
#[test]
fn test_generate_then_report_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("water_data.csv");
    let path_str = path.to_str().unwrap();

    let output = wm(&["generate", "--days", "3", "--seed", "11", "--output", path_str]);
    assert!(output.status.success(), "Generate should succeed");
    assert!(path.exists());

    let output = wm(&["report", "--input", path_str, "--format", "json"]);
    assert!(output.status.success(), "Report should succeed");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sample_count"], 72);
    assert!(report["summary"]["today_usage"].as_f64().unwrap() > 0.0);
    assert!(report["daily_trend"].as_array().unwrap().len() >= 3);
    assert!(
        report["recommendations"]
            .as_array()
            .unwrap()
            .last()
            .unwrap()
            == "Encourage water conservation awareness"
    );
}

/// Test the table report on a known scenario
#[test]
fn test_report_table_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    write_scenario(&path);

    let output = wm(&["report", "--input", path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Report should succeed");
    assert!(stdout.contains("System Overview"));
    assert!(stdout.contains("Stable"));
    assert!(stdout.contains("Leak detected at 2024-03-01 10:00 | Extra usage: 50 L"));
    assert!(stdout.contains("1 abnormal consumption points found"));
    assert!(stdout.contains("✔ Dispatch maintenance team"));
    assert!(!stdout.contains("Reduce pressure during peak hours"));
}

/// Test leak listing as JSON
#[test]
fn test_leaks_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    write_scenario(&path);

    let output = wm(&["leaks", "--input", path.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "Leaks should succeed");

    let leaks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let leaks = leaks.as_array().unwrap();
    assert_eq!(leaks.len(), 1);
    assert_eq!(leaks[0]["index"], 10);
    assert_eq!(leaks[0]["extra_usage"], 50.0);
}

/// Test forecast and anomaly commands agree with the scenario
#[test]
fn test_forecast_and_anomalies_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    write_scenario(&path);
    let input = path.to_str().unwrap();

    let output = wm(&["forecast", "--input", input, "--format", "json"]);
    assert!(output.status.success(), "Forecast should succeed");
    let forecast: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(forecast["horizon_index"], 48);
    let predicted = forecast["predicted_usage"].as_f64().unwrap();
    assert!((predicted - 100.0).abs() < 2.0);

    let output = wm(&["anomalies", "--input", input, "--format", "json", "--seed", "3"]);
    assert!(output.status.success(), "Anomalies should succeed");
    let flagged: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let flagged = flagged.as_array().unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["index"], 10);
}

/// Test that configuration from the environment reaches the pipeline
#[test]
fn test_peak_threshold_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    write_scenario(&path);

    let output = Command::new(env!("CARGO_BIN_EXE_wm"))
        .args(["recommend", "--input", path.to_str().unwrap()])
        .env("NO_COLOR", "1")
        .env("WM_PEAK_THRESHOLD", "50")
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Recommend should succeed");
    assert!(stdout.contains("✔ Reduce pressure during peak hours"));
}

/// Test that a config file given after the subcommand is honored
#[test]
fn test_config_file_after_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("scenario.csv");
    write_scenario(&data);
    let config = dir.path().join("wm.toml");
    fs::write(
        &config,
        format!("input = \"{}\"\npeak_threshold = 50.0\n", data.display()),
    )
    .unwrap();

    let output = wm(&["recommend", "--config", config.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Recommend should accept --config");
    assert!(stdout.contains("✔ Reduce pressure during peak hours"));
}

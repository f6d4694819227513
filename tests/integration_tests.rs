//! Integration tests for the weathersense CLI

use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Run the binary with an isolated (absent) config file
fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config: PathBuf = dir.path().join("config.toml");
    Command::new(env!("CARGO_BIN_EXE_weathersense"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_weathersense"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weathersense"));
    assert!(stdout.contains("--reference"));
}

#[test]
fn test_cli_requires_a_query() {
    let output = Command::new(env!("CARGO_BIN_EXE_weathersense"))
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_interprets_query_words() {
    let output = run(&[
        "--reference",
        "2025-10-28",
        "weather",
        "in",
        "Tel",
        "Aviv",
        "from",
        "2025-10-20",
        "to",
        "2025-10-24,",
        "metric",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["params"]["location"], "Tel Aviv");
    assert_eq!(json["params"]["start_date"], "2025-10-20");
    assert_eq!(json["params"]["end_date"], "2025-10-24");
    assert_eq!(json["params"]["units"], "metric");
    assert!(json["params"]["confidence"].as_f64().unwrap() >= 0.7);
    assert_eq!(json["cache_key"], "weather:tel aviv:2025-10-20:2025-10-24:metric");
}

#[test]
fn test_relative_dates_use_reference() {
    let output = run(&["--reference", "2025-10-28", "forecast near 48.8566,2.3522 tomorrow"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["params"]["location"]["lat"], 48.8566);
    assert_eq!(json["params"]["location"]["lon"], 2.3522);
    assert_eq!(json["params"]["start_date"], "2025-10-29");
    assert_eq!(json["cache_key"], "weather:48.86,2.35:2025-10-29:2025-10-29:metric");
}

#[test]
fn test_rejected_query_exits_with_error_body() {
    let output = run(&["--reference", "2025-10-28", "weather at 91.0,34.78 tomorrow"]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["error"], "invalid_coordinate");
    assert!(json["hint"].as_str().unwrap().contains("90"));
}

#[test]
fn test_unsafe_query_is_rejected() {
    let output = run(&["<script>alert(1)</script> weather in Paris today"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["error"], "invalid_input");
}

#[test]
fn test_invalid_reference_date() {
    let output = run(&["--reference", "2025-13-01", "weather in Paris today"]);
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));
}

use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gridiron-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("persistence"));
}

#[test]
fn cli_writes_json_report_for_smoke_run() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output_path = temp_path("report.json");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,determinism",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--max-seasons",
            "2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Gridiron Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&content).expect("parse report");
    assert_eq!(report["results"].as_array().map(Vec::len), Some(4));
    assert_eq!(report["aggregate"]["careers"], 8);
}

#[test]
fn cli_exports_narration_log() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let log_path = temp_path("career.log");
    let report_path = temp_path("report.md");
    let status = Command::new(exe)
        .args([
            "--report",
            "markdown",
            "--iterations",
            "1",
            "--seeds",
            "7",
            "--coach",
            "Jordan",
            "--default-side",
            "defense",
            "--export-log",
        ])
        .arg(&log_path)
        .arg("--output")
        .arg(&report_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let log = std::fs::read_to_string(log_path).expect("read log");
    assert!(log.starts_with("NEW CAREER started for Jordan."));
    assert!(log.contains("Season 1 preseason."));
    let report = std::fs::read_to_string(report_path).expect("read report");
    assert!(report.contains("# Gridiron Career Test Results"));
}

#[test]
fn cli_rejects_unknown_side() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output = Command::new(exe)
        .args(["--default-side", "special-teams"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("special-teams"));
}

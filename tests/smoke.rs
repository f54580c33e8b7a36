//! Smoke tests -- verify the binary runs and reports load outcomes.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("runs-dashboard").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUNS_DASHBOARD_CONFIG")
        .env_remove("RUNS_DASHBOARD_API_BASE")
        .env_remove("RUST_LOG");
    cmd
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("runs-dashboard")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Dashboard for test runs"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("runs-dashboard")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("runs-dashboard"));
}

#[test]
fn test_show_subcommand_exists() {
    Command::cargo_bin("runs-dashboard")
        .unwrap()
        .args(["show", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--api-base"));
}

#[test]
fn test_unreachable_api_prints_error_row_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["show", "--api-base", &closed_port_url()])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("Error loading data:"))
        .stdout(predicates::str::contains("Loading...").not());
}

#[test]
fn test_unreachable_api_html_output() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["show", "--format", "html", "--layout", "legacy", "--api-base", &closed_port_url()])
        .assert()
        .code(1)
        .stdout(predicates::str::starts_with(r#"<tbody id="runs-table-body">"#))
        .stdout(predicates::str::contains(r#"colspan="7""#));
}

#[test]
fn test_output_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("runs.json");
    cli(&dir)
        .args(["show", "--format", "json", "--api-base", &closed_port_url(), "--output"])
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicates::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["rows"][0]["kind"], "message");
}

#[test]
fn test_config_subcommand_reads_local_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("runs-dashboard.toml"),
        "[api]\nbase_url = \"http://runs.example:9000\"\n",
    )
    .unwrap();

    cli(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("http://runs.example:9000"))
        .stdout(predicates::str::contains("runs-table-body"));
}

#[test]
fn test_explicit_missing_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["--config", "missing.toml", "config"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read config file"));
}

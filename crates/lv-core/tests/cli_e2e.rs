//! End-to-end tests for the `lv` binary.
//!
//! These run the real binary against the fixtures in test/fixtures/report
//! and check stdout payloads, written files and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test/fixtures/report")
        .join(name)
}

/// `lv` with config discovery isolated from the host.
fn lv() -> Command {
    let mut cmd = Command::cargo_bin("lv").expect("lv binary should exist");
    cmd.env_remove("LV_CONFIG")
        .env_remove("LV_CONFIG_DIR")
        .env_remove("LV_LOG")
        .env_remove("LV_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", "/nonexistent/lv-e2e");
    cmd
}

fn data_args(lib_file: &str) -> Vec<String> {
    vec![
        "--main-data".to_string(),
        fixture("main_data.json").display().to_string(),
        "--lib-data".to_string(),
        fixture(lib_file).display().to_string(),
    ]
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ============================================================================
// Argument Handling
// ============================================================================

mod args {
    use super::*;

    #[test]
    fn version_prints_json() {
        let output = lv().arg("version").output().unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["lv_version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn missing_subcommand_is_args_error() {
        lv().assert().code(10);
    }

    #[test]
    fn unknown_subcommand_is_args_error() {
        lv().arg("explode")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn render_requires_out() {
        lv().arg("render")
            .args(data_args("lib_data.json"))
            .assert()
            .code(10)
            .stderr(predicate::str::contains("--out"));
    }

    #[test]
    fn bad_log_format_rejected() {
        lv().args(["--log-format", "xml", "version"])
            .assert()
            .code(10);
    }

    #[test]
    fn help_succeeds() {
        lv().arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("render"));
    }
}

// ============================================================================
// Render
// ============================================================================

mod render {
    use super::*;

    #[test]
    fn clean_report_written() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report.html");
        let output = lv()
            .arg("render")
            .args(data_args("lib_data.json"))
            .arg("--out")
            .arg(&out)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));

        let json = stdout_json(&output);
        assert_eq!(json["status"], "OK_CLEAN");
        assert_eq!(json["pages"], 3);
        assert!(json["failed_pages"].as_array().unwrap().is_empty());

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("TCS-2025-06-01"));
    }

    #[test]
    fn malformed_library_degrades_but_writes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report.html");
        let output = lv()
            .arg("render")
            .args(data_args("lib_data_with_malformed.json"))
            .arg("--out")
            .arg(&out)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(3));

        let json = stdout_json(&output);
        assert_eq!(json["status"], "OK_DEGRADED");
        assert_eq!(json["failed_pages"], serde_json::json!(["LIB3"]));
        assert!(out.exists(), "report must still be written");
    }

    #[test]
    fn title_override_escaped() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report.html");
        lv().arg("render")
            .args(data_args("lib_data.json"))
            .args(["--title", "Run <7>"])
            .arg("--out")
            .arg(&out)
            .assert()
            .code(0);
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("<title>Run &lt;7&gt;</title>"));
    }

    #[test]
    fn missing_input_is_io_error() {
        let tmp = TempDir::new().unwrap();
        lv().arg("render")
            .args(["--main-data", "/nonexistent/main_data.json"])
            .arg("--lib-data")
            .arg(fixture("lib_data.json"))
            .arg("--out")
            .arg(tmp.path().join("r.html"))
            .assert()
            .code(21)
            .stderr(predicate::str::contains("cannot load report data"));
    }

    #[test]
    fn undecodable_input_is_data_error() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("main_data.json");
        std::fs::write(&bad, "{ not json").unwrap();
        lv().arg("render")
            .arg("--main-data")
            .arg(&bad)
            .arg("--lib-data")
            .arg(fixture("lib_data.json"))
            .arg("--out")
            .arg(tmp.path().join("r.html"))
            .assert()
            .code(15);
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let tmp = TempDir::new().unwrap();
        lv().arg("render")
            .args(data_args("lib_data.json"))
            .arg("--out")
            .arg(tmp.path().join("missing-dir").join("r.html"))
            .assert()
            .code(21);
    }

    #[test]
    fn empty_default_library_is_args_error() {
        let tmp = TempDir::new().unwrap();
        lv().arg("render")
            .args(data_args("lib_data.json"))
            .args(["--default-library", " "])
            .arg("--out")
            .arg(tmp.path().join("r.html"))
            .assert()
            .code(10);
    }
}

// ============================================================================
// Configuration Resolution
// ============================================================================

mod config {
    use super::*;

    fn inspect_title(cmd: &mut Command) -> String {
        let output = cmd
            .arg("inspect")
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        stdout_json(&output)["title"].as_str().unwrap().to_string()
    }

    #[test]
    fn defaults_without_config() {
        assert_eq!(inspect_title(&mut lv()), "TCS Log Report: TCS-2025-06-01");
    }

    #[test]
    fn cli_config_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.json");
        std::fs::write(&path, r#"{"title": "From CLI"}"#).unwrap();
        let mut cmd = lv();
        cmd.arg("--config").arg(&path);
        assert_eq!(inspect_title(&mut cmd), "From CLI");
    }

    #[test]
    fn env_config_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("report.json"), r#"{"title": "From Dir"}"#).unwrap();
        let mut cmd = lv();
        cmd.env("LV_CONFIG_DIR", tmp.path());
        assert_eq!(inspect_title(&mut cmd), "From Dir");
    }

    #[test]
    fn cli_beats_env() {
        let tmp = TempDir::new().unwrap();
        let cli = tmp.path().join("cli.json");
        let env = tmp.path().join("env.json");
        std::fs::write(&cli, r#"{"title": "CLI"}"#).unwrap();
        std::fs::write(&env, r#"{"title": "ENV"}"#).unwrap();
        let mut cmd = lv();
        cmd.env("LV_CONFIG", &env).arg("--config").arg(&cli);
        assert_eq!(inspect_title(&mut cmd), "CLI");
    }

    #[test]
    fn missing_config_file_is_args_error() {
        lv().args(["--config", "/nonexistent/report.json", "inspect"])
            .args(data_args("lib_data.json"))
            .assert()
            .code(10)
            .stderr(predicate::str::contains("configuration error"));
    }

    #[test]
    fn invalid_palette_is_args_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r##"{"colors": {"palette": ["#zzz"]}}"##).unwrap();
        lv().arg("--config")
            .arg(&path)
            .arg("inspect")
            .args(data_args("lib_data.json"))
            .assert()
            .code(10);
    }
}

// ============================================================================
// Inspect and Validate
// ============================================================================

mod inspect {
    use super::*;

    #[test]
    fn lists_pages_and_drilldowns() {
        let output = lv()
            .arg("inspect")
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        let pages = json["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1]["label"], "LIB1");
        assert_eq!(
            pages[1]["drilldown_labels"],
            serde_json::json!(["GeneralFilterFailed", "NoMatch"])
        );
    }

    #[test]
    fn single_library() {
        let output = lv()
            .arg("inspect")
            .args(data_args("lib_data.json"))
            .args(["--library", "LIB2"])
            .output()
            .unwrap();
        let json = stdout_json(&output);
        assert_eq!(json["pages"].as_array().unwrap().len(), 1);
        assert_eq!(json["pages"][0]["label"], "LIB2");
    }

    #[test]
    fn unknown_library_is_args_error() {
        lv().arg("inspect")
            .args(data_args("lib_data.json"))
            .args(["--library", "LIB9"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("LIB9"));
    }

    #[test]
    fn failed_page_reported() {
        let output = lv()
            .arg("inspect")
            .args(data_args("lib_data_with_malformed.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        let json = stdout_json(&output);
        assert_eq!(json["failed_pages"], serde_json::json!(["LIB3"]));
        let lib3 = json["pages"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["label"] == "LIB3")
            .unwrap();
        assert_eq!(lib3["error"]["kind"], "malformed_dataset");
    }
}

mod validate {
    use super::*;

    #[test]
    fn clean_data_exits_zero() {
        let output = lv()
            .arg("validate")
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["malformed"], 0);
        assert_eq!(json["library_count"], 2);
    }

    #[test]
    fn malformed_data_exits_fifteen() {
        let output = lv()
            .arg("validate")
            .args(data_args("lib_data_with_malformed.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(15));
        let json = stdout_json(&output);
        assert_eq!(json["malformed"], 1);
    }

    #[test]
    fn jsonl_logs_go_to_stderr() {
        let output = lv()
            .args(["--log-format", "jsonl", "-v", "validate"])
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        // stdout stays a single JSON document
        stdout_json(&output);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first = stderr.lines().next().expect("debug logging emits events");
        let event: Value = serde_json::from_str(first).expect("stderr lines are JSON");
        assert!(event.get("level").is_some());
    }

    #[test]
    fn quiet_overrides_rust_log() {
        let output = lv()
            .env("RUST_LOG", "info")
            .args(["-q", "validate"])
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("INFO"), "stderr: {stderr}");
    }

    #[test]
    fn lv_log_overrides_rust_log() {
        let output = lv()
            .env("LV_LOG", "error")
            .env("RUST_LOG", "info")
            .arg("validate")
            .args(data_args("lib_data.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("INFO"), "stderr: {stderr}");
    }

    #[test]
    fn rust_log_directives_apply_alone() {
        lv().env("RUST_LOG", "lv=info")
            .args(["--no-timestamps", "validate"])
            .args(data_args("lib_data.json"))
            .assert()
            .code(0)
            .stderr(predicate::str::contains("Validation complete"));
    }
}

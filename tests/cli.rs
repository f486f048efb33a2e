//! Binary-level tests.
//!
//! Every invocation runs with an empty temporary home so no real user
//! configuration or environment leaks in. Backend-facing commands run
//! against a `wiremock` server.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `vidar` command isolated from the caller's config and environment.
fn vidar(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidar").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("VIDAR_CONFIG")
        .env_remove("VIDAR_BACKEND_URL")
        .env_remove("VIDAR_INTERNAL_UI_TOKEN")
        .env_remove("VIDAR_LOG");
    cmd
}

fn write_config(home: &TempDir, contents: &str) {
    let dir = home.path().join("vidar");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn help_and_version() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("amendments"))
        .stdout(predicate::str::contains("rules"));
    vidar(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn rules_list_prints_catalog() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SOVR-001"))
        .stdout(predicate::str::contains("PROD-002"))
        .stdout(predicate::str::contains("12 rules · policy version 1.0.0"));
}

#[test]
fn rules_list_json() {
    let home = TempDir::new().unwrap();
    let output = vidar(&home)
        .args(["rules", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = value.as_array().unwrap();
    assert_eq!(rules.len(), 12);
    assert_eq!(rules[0]["code"], "SOVR-001");
    assert_eq!(rules[11]["code"], "PROD-002");
}

#[test]
fn rules_show_known_and_unknown() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["rules", "show", "COMP-001"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("COMP-001"));
    vidar(&home)
        .args(["rules", "show", "NOPE-999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule NOPE-999 is not in the catalog."));
    vidar(&home)
        .args(["rules", "show", "NOPE-999", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn quiet_suppresses_text_output() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["-q", "rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn completion_bash() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vidar"));
}

#[test]
fn config_show_reports_sources() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8001 (default)"))
        .stdout(predicate::str::contains("not set"));

    vidar(&home)
        .args(["config", "show"])
        .env("VIDAR_BACKEND_URL", "https://env.example")
        .env("VIDAR_INTERNAL_UI_TOKEN", "secret-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example (env)"))
        .stdout(predicate::str::contains("set (env)"))
        .stdout(predicate::str::contains("secret-token").not());

    vidar(&home)
        .args(["config", "show", "--backend-url", "https://flag.example"])
        .env("VIDAR_BACKEND_URL", "https://env.example")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://flag.example (flag)"));
}

#[test]
fn config_file_is_found_and_validated() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No config file found."));

    write_config(&home, "backend_url = \"https://file.example\"\n");
    vidar(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    vidar(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://file.example (file)"));

    write_config(&home, "[display]\npage_size = 0\n");
    vidar(&home)
        .args(["rules", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: Failed to load configuration"));
}

#[test]
fn invalid_backend_flag_is_rejected() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["estate", "--backend-url", "ftp://nowhere"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn unreachable_backend_fails_with_error() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["estate", "--backend-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: Failed to load estate health"));
}

#[test]
fn transition_without_yes_refuses_when_not_interactive() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args([
            "amendments",
            "approve",
            "a1",
            "--actor",
            "alice",
            "--no-interactive",
            "--backend-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Pass --yes to proceed."));
}

#[test]
fn transition_with_blank_actor_fails() {
    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["amendments", "reject", "a1", "--actor", "  ", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("actor is required"));
}

#[tokio::test]
async fn estate_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/governance/estate-health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_systems": 10,
            "active_systems": 8,
            "inactive_systems": 2
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    vidar(&home)
        .args(["estate", "--backend-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 (80%)"))
        .stdout(predicate::str::contains("Last 30 Days"));
}

#[tokio::test]
async fn approve_with_yes_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/internal/amendments/a1/approve"))
        .and(body_json(json!({"transitioned_by": "alice", "notes": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/internal/amendments/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amendment_id": "a1",
            "amendment_code": "AMD-017",
            "current_state": "APPROVED",
            "amendment_type": "ADDITION"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    vidar(&home)
        .args([
            "amendments",
            "approve",
            "a1",
            "--actor",
            "alice",
            "--yes",
            "--backend-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Approved AMD-017 by alice. State is now APPROVED.",
        ));
}

#[tokio::test]
async fn approve_dot_segment_id_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    vidar(&home)
        .args([
            "amendments",
            "approve",
            "..",
            "--actor",
            "x",
            "--yes",
            "--backend-url",
            &server.uri(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a valid resource id"));
}

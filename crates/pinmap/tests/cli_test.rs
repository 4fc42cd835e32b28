//! Integration tests for the `pinmap` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes. Upstreams
//! are either never contacted or mocked with wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `pinmap` with env isolation: no real config file, no token, no
/// `PINMAP_*` overrides from the caller's shell.
fn pinmap_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pinmap");
    cmd.env("HOME", "/tmp/pinmap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pinmap-cli-test-nonexistent")
        .env("PINMAP_WORKSPACE__NAME", "pinmap-cli-test")
        .env_remove("PINMAP_CONFIG")
        .env_remove("PINMAP_TIMEOUT")
        .env_remove("PINMAP_WORKSPACE__TOKEN")
        .env_remove("PINMAP_WORKSPACE__TOKEN_ENV")
        .env_remove("PINMAP_GEOCODER__URL")
        .env_remove("NOTION_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pinmap_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_subcommands() {
    pinmap_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("geocode"))
            .and(predicate::str::contains("markers")),
    );
}

#[test]
fn test_version_flag() {
    pinmap_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pinmap"));
}

#[test]
fn test_completions_bash() {
    pinmap_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error exit codes ────────────────────────────────────────────────

#[test]
fn test_blank_address_is_usage_error() {
    pinmap_cmd()
        .args(["geocode", "  "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing address parameter"));
}

#[test]
fn test_markers_without_token_is_auth_error() {
    pinmap_cmd()
        .args(["markers", "db-1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No workspace token configured"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    pinmap_cmd()
        .args(["serve", "--bind", "not-an-ip"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("server.bind"));
}

// ── Geocoding against a mock upstream ───────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_prints_first_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Ferry Building"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "37.7955", "lon": "-122.3937", "display_name": "Ferry Building" }
        ])))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        pinmap_cmd()
            .env("PINMAP_GEOCODER__URL", uri)
            .env("PINMAP_GEOCODER__MIN_INTERVAL_MS", "0")
            .args(["geocode", "Ferry Building"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["lat"], "37.7955");
    assert_eq!(printed["lon"], "-122.3937");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_no_results_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        pinmap_cmd()
            .env("PINMAP_GEOCODER__URL", uri)
            .args(["geocode", "Nowhere"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("No results found"));
}

// ── Config inspection ───────────────────────────────────────────────

#[test]
fn test_config_show_redacts_token() {
    pinmap_cmd()
        .env("PINMAP_WORKSPACE__TOKEN", "secret_should_not_print")
        .env("PINMAP_SERVER__PORT", "8123")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("port = 8123")
                .and(predicate::str::contains("<redacted>"))
                .and(predicate::str::contains("secret_should_not_print").not()),
        );
}

#[test]
fn test_config_path_honours_flag() {
    pinmap_cmd()
        .args(["config", "path", "--config", "/tmp/pinmap-elsewhere.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/pinmap-elsewhere.toml"));
}

//! Integration tests for the `motionctl` binary.
//!
//! Argument parsing, help, completions and error paths run without a
//! daemon; the rest talk to a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `motionctl` with every `MOTION_*` variable cleared and the config file
/// pointed at `config`.
fn motionctl(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("motionctl");
    cmd.env("MOTIONCTL_CONFIG", config)
        .env_remove("RUST_LOG")
        .env_remove("MOTION_PROFILE")
        .env_remove("MOTION_HOST")
        .env_remove("MOTION_PORT")
        .env_remove("MOTION_USERNAME")
        .env_remove("MOTION_PASSWORD")
        .env_remove("MOTION_TLS")
        .env_remove("MOTION_OUTPUT")
        .env_remove("MOTION_TIMEOUT");
    cmd
}

fn missing_config() -> std::path::PathBuf {
    Path::new("/tmp/motionctl-test-nonexistent/config.toml").to_path_buf()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// One camera (`camera_id = 101`, paused) behind a plaintext webctrl.
async fn daemon() -> MockServer {
    let server = MockServer::start().await;
    mount_text(&server, "/", "Motion 4.3.2 Running [1] Camera\n0\n1\n").await;
    mount_text(
        &server,
        "/0/config/list",
        "webcontrol_tls = off\nstream_port = 8081\nframerate = 10\n",
    )
    .await;
    mount_text(
        &server,
        "/1/config/list",
        "camera_id = 101\ncamera_name = Porch\nframerate = 15\n",
    )
    .await;
    mount_text(&server, "/0/detection/connection", "Camera 101 Connection OK\n").await;
    mount_text(
        &server,
        "/0/detection/status",
        "Camera 101 Detection status PAUSE\n",
    )
    .await;
    server
}

/// Run a prepared command off the async runtime so the mock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn against(server: &MockServer, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = motionctl(&missing_config());
    let addr = server.address();
    cmd.args(["--host", &addr.ip().to_string(), "--port", &addr.port().to_string()])
        .args(["--tls", "none"])
        .args(args);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = motionctl(&missing_config()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    motionctl(&missing_config())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("motion")
                .and(predicate::str::contains("cameras"))
                .and(predicate::str::contains("detection"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_version_flag() {
    motionctl(&missing_config())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("motionctl"));
}

#[test]
fn test_completions_bash() {
    motionctl(&missing_config())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    motionctl(&missing_config())
        .args(["--output", "xml", "status"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_no_daemon_configured() {
    motionctl(&missing_config())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No daemon configured"));
}

#[test]
fn test_unknown_profile() {
    motionctl(&missing_config())
        .args(["--profile", "attic", "cameras"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Profile 'attic' not found"));
}

#[test]
fn test_bad_assignment_fails_before_connecting() {
    motionctl(&missing_config())
        .args(["--host", "127.0.0.1", "--port", "9", "config", "set", "framerate=fast"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("framerate"));
}

// ── Profiles ────────────────────────────────────────────────────────

#[test]
fn test_profile_add_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    motionctl(&config)
        .args(["--host", "10.0.0.5", "--port", "7999", "--tls", "relaxed"])
        .args(["profile", "add", "garage", "--password-env", "GARAGE_PW"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&config).unwrap();
    assert!(saved.contains("[profiles.garage]"));
    assert!(saved.contains("default_profile = \"garage\""));

    motionctl(&config)
        .args(["--output", "json", "profile", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"host\": \"10.0.0.5\"")
                .and(predicate::str::contains("\"port\": 7999"))
                .and(predicate::str::contains("\"tls_mode\": \"relaxed\""))
                .and(predicate::str::contains("$GARAGE_PW")),
        );
}

#[test]
fn test_profile_add_needs_host() {
    let dir = tempfile::tempdir().unwrap();
    motionctl(&dir.path().join("config.toml"))
        .args(["profile", "add", "garage"])
        .assert()
        .code(2);
}

// ── Against a daemon ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_cameras_json() {
    let server = daemon().await;
    let output = run(against(&server, &["--output", "json", "cameras"])).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"camera_id\": \"101\""), "{stdout}");
    assert!(stdout.contains("\"name\": \"Porch\""), "{stdout}");
    assert!(stdout.contains("\"connected\": true"), "{stdout}");
    assert!(stdout.contains("\"paused\": true"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_get_plain() {
    let server = daemon().await;
    let output = run(against(
        &server,
        &["--output", "plain", "config", "get", "framerate", "--camera", "1"],
    ))
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "15");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_get_missing_option() {
    let server = daemon().await;
    let output = run(against(&server, &["config", "get", "no_such_option"])).await;
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_set_sends_changed_value() {
    let server = daemon().await;
    Mock::given(method("GET"))
        .and(path("/1/config/set"))
        .and(query_param("framerate", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string("framerate = 20\nDone\n"))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(against(
        &server,
        &["config", "set", "framerate=20", "--camera", "1"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_snapshot() {
    let server = daemon().await;
    Mock::given(method("GET"))
        .and(path("/1/action/snapshot"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Snapshot for camera 1\nDone\n"))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(against(&server, &["snapshot", "1"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Snapshot taken on camera 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let output = run(against(&server, &["status"])).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

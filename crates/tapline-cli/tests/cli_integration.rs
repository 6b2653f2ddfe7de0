use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn tapline() -> Command {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.env_remove("TAPLINE_CONFIG")
        .env_remove("TAPLINE_APPIUM_URL")
        .env_remove("TAPLINE_USERNAME")
        .env_remove("TAPLINE_PASSWORD");
    cmd
}

#[test]
fn test_help_exits_zero() {
    tapline()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tapline"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("smoke-login"));
}

#[test]
fn test_launch_help_lists_variants() {
    tapline()
        .args(["launch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("android-native"))
        .stdout(predicate::str::contains("ios-web"));
}

#[test]
fn test_unknown_variant_is_rejected() {
    tapline()
        .args([
            "launch",
            "windows-native",
            "--device-name",
            "x",
            "--udid",
            "y",
            "--port",
            "8200",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("windows-native"));
}

#[test]
fn test_launch_requires_port() {
    tapline()
        .args(["launch", "android-native", "--device-name", "x", "--udid", "y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_missing_config_file_is_connection_error() {
    tapline()
        .args(["--config", "/definitely/not/here.json", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Connection error"));
}

#[test]
fn test_status_without_url_is_connection_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{}}").unwrap();
    tapline()
        .args(["--config", file.path().to_str().unwrap(), "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("appiumURL"));
}

#[test]
fn test_launch_against_closed_port_fails_initialization() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"appPackage": "com.example", "appActivity": "com.example.Main"}}"#
    )
    .unwrap();
    tapline()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "--url",
            "http://127.0.0.1:9",
            "launch",
            "android-native",
            "--device-name",
            "Pixel_7",
            "--udid",
            "emulator-5554",
            "--port",
            "8200",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Failed to initialize driver. Please check the desired capabilities",
        ));
}

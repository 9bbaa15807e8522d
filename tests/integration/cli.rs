use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn launcher_in(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("autoupdater").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Test that help lists the launcher flags
#[test]
fn test_help_lists_flags() {
    let temp = TempDir::new().unwrap();
    launcher_in(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-launch"))
        .stdout(predicate::str::contains("--config"));
}

/// Test that a first run writes default settings and reports what is missing
#[test]
fn test_first_run_creates_settings() {
    let temp = TempDir::new().unwrap();

    launcher_in(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing executable name"));

    let settings = fs::read_to_string(temp.path().join("launcher.toml")).unwrap();
    assert!(settings.contains("executable_name"));
    assert!(settings.contains("match_threshold = 8"));
    assert!(!temp.path().join("Version.txt").exists());
}

/// Test that a custom settings path is honoured
#[test]
fn test_custom_settings_path() {
    let temp = TempDir::new().unwrap();

    launcher_in(temp.path())
        .args(["--config", "conf/staging.toml"])
        .assert()
        .failure();

    assert!(temp.path().join("conf/staging.toml").exists());
    assert!(!temp.path().join("launcher.toml").exists());
}

/// Test that broken TOML fails before any network access
#[test]
fn test_invalid_settings() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("launcher.toml"), "executable_name = [unclosed").unwrap();

    launcher_in(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that --verbose and --quiet cannot be combined
#[test]
fn test_verbose_quiet_conflict() {
    let temp = TempDir::new().unwrap();
    launcher_in(temp.path()).args(["-v", "-q"]).assert().failure();
}

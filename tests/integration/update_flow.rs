use autoupdater_cli::test_utils::ArchiveFixture;
use predicates::prelude::*;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{ASSET_PATH, RELEASE_PATH, TestProject};

fn release_archive() -> ArchiveFixture {
    ArchiveFixture::new()
        .file("MyApp.exe", b"binary v2")
        .file("readme.txt", b"hello")
        .file("data/settings.json", b"{}")
}

/// Test a first install followed by an up-to-date run
#[tokio::test(flavor = "multi_thread")]
async fn test_install_then_up_to_date() {
    let project = TestProject::new().await;
    project.write_settings("");
    project.serve_release("v2.0").await;
    // Only the first run downloads.
    project.serve_asset(&release_archive(), 1).await;

    project.command().arg("--no-launch").assert().success();

    let app = project.app_dir();
    assert_eq!(fs::read(app.join("MyApp.exe")).unwrap(), b"binary v2");
    assert_eq!(fs::read(app.join("readme.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(app.join("data/settings.json")).unwrap(), b"{}");
    assert_eq!(project.marker().as_deref(), Some("v2.0"));
    assert!(!project.dir().join("update.zip").exists());

    project
        .command()
        .args(["--no-launch", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No update needed"));
    assert_eq!(project.marker().as_deref(), Some("v2.0"));
}

/// Test that an invalid release document stops the run before launching
#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_release_fails() {
    let project = TestProject::new().await;
    project.write_settings("auto_launch = true");
    Mock::given(method("GET"))
        .and(path(RELEASE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&project.server)
        .await;
    project.serve_asset(&release_archive(), 0).await;

    project
        .command()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid release metadata"));
    assert_eq!(project.marker(), None);
}

/// Test that a missing executable is reported after an up-to-date check
#[tokio::test(flavor = "multi_thread")]
async fn test_missing_executable_fails() {
    let project = TestProject::new().await;
    project.write_settings("auto_launch = true");
    fs::write(project.dir().join("Version.txt"), "v2.0").unwrap();
    fs::create_dir_all(project.app_dir()).unwrap();
    fs::write(project.app_dir().join("a-completely-different-name.bin"), "").unwrap();
    project.serve_release("v2.0").await;
    project.serve_asset(&release_archive(), 0).await;

    project
        .command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to find launch file 'MyApp.exe'"));
}

/// Test that pressing anything but Enter skips the launch
#[tokio::test(flavor = "multi_thread")]
async fn test_declined_prompt() {
    let project = TestProject::new().await;
    project.write_settings("");
    fs::write(project.dir().join("Version.txt"), "v2.0").unwrap();
    fs::create_dir_all(project.app_dir()).unwrap();
    fs::write(project.app_dir().join("MyApp.exe"), "not runnable").unwrap();
    project.serve_release("v2.0").await;

    project
        .command()
        .write_stdin("no thanks\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Press Enter to launch program"));
}

/// Test that a failed download still launches the existing installation
#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_download_failure_launches_existing() {
    use std::os::unix::fs::PermissionsExt;

    let project = TestProject::new().await;
    project.write_settings("");
    fs::write(project.dir().join("Version.txt"), "v1.0").unwrap();
    fs::create_dir_all(project.app_dir()).unwrap();
    let exe = project.app_dir().join("MyApp.exe");
    fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

    project.serve_release("v2.0").await;
    Mock::given(method("GET"))
        .and(path(ASSET_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&project.server)
        .await;

    project
        .command()
        .arg("--yes")
        .assert()
        .success()
        .stderr(predicate::str::contains("Download failed with status 404"));

    assert_eq!(project.marker().as_deref(), Some("v1.0"));
    assert_eq!(fs::read_to_string(&exe).unwrap(), "#!/bin/sh\nexit 0\n");
}

/// Test that wipe mode clears the previous installation but keeps state files
#[tokio::test(flavor = "multi_thread")]
async fn test_wipe_keeps_launcher_state() {
    let project = TestProject::new().await;
    // Install into the working directory itself.
    let settings = format!(
        "release_endpoint = \"{}\"\nexecutable_name = \"MyApp.exe\"\nwipe_before_install = true\n",
        project.url(RELEASE_PATH)
    );
    fs::write(project.dir().join("launcher.toml"), settings).unwrap();
    fs::write(project.dir().join("Version.txt"), "v1.0").unwrap();
    fs::write(project.dir().join("old-plugin.dll"), "old").unwrap();
    project.serve_release("v2.0").await;
    project.serve_asset(&release_archive(), 1).await;

    project.command().arg("--no-launch").assert().success();

    assert!(!project.dir().join("old-plugin.dll").exists());
    assert!(project.dir().join("launcher.toml").exists());
    assert!(project.dir().join("MyApp.exe").exists());
    assert_eq!(project.marker().as_deref(), Some("v2.0"));
}

/// Test that wipe mode keeps a settings file kept in a subdirectory
#[tokio::test(flavor = "multi_thread")]
async fn test_wipe_keeps_nested_config() {
    let project = TestProject::new().await;
    let settings = format!(
        "release_endpoint = \"{}\"\nexecutable_name = \"MyApp.exe\"\nwipe_before_install = true\n",
        project.url(RELEASE_PATH)
    );
    fs::create_dir_all(project.dir().join("conf")).unwrap();
    fs::write(project.dir().join("conf/launcher.toml"), &settings).unwrap();
    fs::write(project.dir().join("conf/old-notes.txt"), "old").unwrap();
    fs::write(project.dir().join("old-plugin.dll"), "old").unwrap();
    project.serve_release("v2.0").await;
    project.serve_asset(&release_archive(), 1).await;

    project
        .command()
        .args(["--no-launch", "--config", "conf/launcher.toml"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(project.dir().join("conf/launcher.toml")).unwrap(), settings);
    assert!(!project.dir().join("conf/old-notes.txt").exists());
    assert!(!project.dir().join("old-plugin.dll").exists());
    assert!(project.dir().join("MyApp.exe").exists());
    assert_eq!(project.marker().as_deref(), Some("v2.0"));

    // The kept settings still drive the next run.
    project
        .command()
        .args(["--no-launch", "--verbose", "--config", "conf/launcher.toml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No update needed"));
}

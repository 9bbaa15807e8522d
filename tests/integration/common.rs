//! Shared helpers for integration tests.

use assert_cmd::Command;
use autoupdater_cli::test_utils::{ArchiveFixture, release_json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RELEASE_PATH: &str = "/repos/owner/app/releases/latest";
pub const ASSET_PATH: &str = "/download/app.zip";

/// A working directory plus a mock release server.
pub struct TestProject {
    pub temp: TempDir,
    pub server: MockServer,
}

impl TestProject {
    pub async fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
            server: MockServer::start().await,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn app_dir(&self) -> PathBuf {
        self.dir().join("app")
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server.uri())
    }

    /// Writes `launcher.toml` pointing at the mock server.
    pub fn write_settings(&self, extra: &str) {
        let settings = format!(
            "release_endpoint = \"{}\"\nbase_path = \"app\"\nexecutable_name = \"MyApp.exe\"\n{extra}",
            self.url(RELEASE_PATH)
        );
        fs::write(self.dir().join("launcher.toml"), settings).unwrap();
    }

    pub async fn serve_release(&self, tag: &str) {
        let asset = self.url(ASSET_PATH);
        Mock::given(method("GET"))
            .and(path(RELEASE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(release_json(tag, &[asset.as_str()])))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_asset(&self, archive: &ArchiveFixture, hits: u64) {
        Mock::given(method("GET"))
            .and(path(ASSET_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.to_bytes().unwrap()))
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    pub fn marker(&self) -> Option<String> {
        fs::read_to_string(self.dir().join("Version.txt")).ok()
    }

    /// The launcher binary running in the project directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("autoupdater").unwrap();
        cmd.current_dir(self.dir())
            .env("NO_COLOR", "1")
            .env("AUTOUPDATER_NO_PROGRESS", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

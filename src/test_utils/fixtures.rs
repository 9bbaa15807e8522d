//! Fixtures for release archives and release index responses.

use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Entry {
    File(String, Vec<u8>),
    Dir(String),
}

/// Builder for in-memory zip archives.
///
/// Entries are written in the order they are added.
#[derive(Default)]
pub struct ArchiveFixture {
    entries: Vec<Entry>,
}

impl ArchiveFixture {
    /// Creates an empty archive fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file entry. `name` is stored verbatim, so `../x` is allowed.
    pub fn file(mut self, name: &str, contents: &[u8]) -> Self {
        self.entries.push(Entry::File(name.to_string(), contents.to_vec()));
        self
    }

    /// Adds a directory entry.
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(Entry::Dir(name.to_string()));
        self
    }

    /// Serializes the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for entry in &self.entries {
            match entry {
                Entry::File(name, contents) => {
                    writer
                        .start_file(name.as_str(), options)
                        .with_context(|| format!("Failed to start entry {name}"))?;
                    writer.write_all(contents)?;
                }
                Entry::Dir(name) => {
                    writer
                        .add_directory(name.as_str(), options)
                        .with_context(|| format!("Failed to add directory {name}"))?;
                }
            }
        }

        Ok(writer.finish().context("Failed to finish archive")?.into_inner())
    }

    /// Writes the archive to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)
            .with_context(|| format!("Failed to write archive to {}", path.display()))
    }
}

/// A GitHub-style latest-release body with one asset per URL.
pub fn release_json(tag: &str, asset_urls: &[&str]) -> serde_json::Value {
    let assets: Vec<_> = asset_urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            serde_json::json!({
                "name": format!("asset-{i}.zip"),
                "browser_download_url": url,
            })
        })
        .collect();

    serde_json::json!({
        "tag_name": tag,
        "name": format!("Release {tag}"),
        "draft": false,
        "prerelease": false,
        "assets": assets,
    })
}

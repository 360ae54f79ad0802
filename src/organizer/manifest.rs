//! Name manifest and playlist index file

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// One track's block in the name manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub index: u64,
    pub segments: Vec<String>,
    pub playlist_label: String,
}

/// Where the two manifest files were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    pub names: PathBuf,
    pub playlist: PathBuf,
}

impl ManifestEntry {
    /// Index line, segment lines, label line, blank line
    pub fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "{}", self.index);
        for segment in &self.segments {
            let _ = writeln!(out, "{}", single_line(segment));
        }
        let _ = writeln!(out, "{}", single_line(&self.playlist_label));
        out.push('\n');
    }
}

/// Collapse line breaks so one value stays on one line
fn single_line(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_names_manifest(entries: &[ManifestEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        entry.render_into(&mut out);
    }
    out
}

/// Assigned indexes, one per line
pub fn render_playlist_index(entries: &[ManifestEntry]) -> String {
    entries.iter().map(|e| format!("{}\n", e.index)).collect()
}

/// Write (or overwrite) both manifest files
pub async fn write_manifests(
    names_path: &Path,
    playlist_path: &Path,
    entries: &[ManifestEntry],
) -> Result<ManifestPaths> {
    write_text(names_path, &render_names_manifest(entries)).await?;
    write_text(playlist_path, &render_playlist_index(entries)).await?;

    debug!(
        "Wrote {} manifest entries to {} and {}",
        entries.len(),
        names_path.display(),
        playlist_path.display()
    );

    Ok(ManifestPaths {
        names: names_path.to_path_buf(),
        playlist: playlist_path.to_path_buf(),
    })
}

async fn write_text(path: &Path, contents: &str) -> Result<()> {
    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    file.flush().await?;
    Ok(())
}

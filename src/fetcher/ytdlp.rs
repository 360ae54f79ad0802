//! yt-dlp wrapper for playlist audio download
//!
//! Runs yt-dlp with audio extraction and thumbnail writing enabled, inside
//! the library root. Supports a configured binary, one next to the
//! executable, and system-installed yt-dlp.

use crate::fetcher::models::{FetchSummary, PlaylistRequest};
use crate::fetcher::traits::MediaFetcher;
use crate::utils::config::FetcherSettings;
use crate::utils::error::PlayshelfError;
use crate::utils::platform;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Number of stderr lines kept for the failure message
const STDERR_TAIL: usize = 20;

/// Playlist fetcher backed by the yt-dlp binary
pub struct YtDlpFetcher {
    ytdlp_path: PathBuf,
    settings: FetcherSettings,
}

impl YtDlpFetcher {
    /// Resolve yt-dlp and build the fetcher
    pub fn new(settings: FetcherSettings) -> Result<Self> {
        let ytdlp_path = match settings.ytdlp_path.clone().or_else(find_ytdlp) {
            Some(path) => {
                info!("Using yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found anywhere!");
                return Err(PlayshelfError::YtDlpNotFound.into());
            }
        };

        Ok(Self {
            ytdlp_path,
            settings,
        })
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }

    /// Arguments for one playlist download
    pub fn build_args(&self, url: &str) -> Vec<String> {
        let s = &self.settings;
        vec![
            "-f".to_string(),
            s.format.clone(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            s.audio_format.clone(),
            "--audio-quality".to_string(),
            s.audio_quality.clone(),
            "--write-thumbnail".to_string(),
            "-o".to_string(),
            s.output_template.clone(),
            "--newline".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    async fn fetch_playlist(
        &self,
        request: &PlaylistRequest,
        work_dir: &Path,
    ) -> Result<FetchSummary> {
        debug!("Fetching playlist {} into {}", request.url, work_dir.display());

        let mut cmd = AsyncCommand::new(&self.ytdlp_path);
        cmd.args(self.build_args(&request.url))
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.ytdlp_path.display()))?;

        // Drain stderr separately so a full pipe cannot stall yt-dlp
        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                let mut tail: Vec<String> = Vec::new();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!("[yt-dlp] {}", line);
                    if tail.len() == STDERR_TAIL {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
                tail
            })
        });

        let mut summary = FetchSummary::default();
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                debug!("[yt-dlp] {}", line);
                if let Some(file) = parse_destination_line(&line) {
                    summary.produced.push(file.to_string());
                }
            }
        }

        let status = child.wait().await?;
        let stderr_tail = match stderr_task {
            Some(handle) => handle.await.unwrap_or_default(),
            None => Vec::new(),
        };

        if !status.success() {
            let message = if stderr_tail.is_empty() {
                format!("yt-dlp exited with {}", status)
            } else {
                stderr_tail.join("\n")
            };
            error!("yt-dlp fetch failed: {}", message);
            return Err(PlayshelfError::FetchFailed(message).into());
        }

        info!("yt-dlp produced {} audio files", summary.produced.len());
        Ok(summary)
    }
}

/// File name from an `[ExtractAudio] Destination: <path>` line
pub fn parse_destination_line(line: &str) -> Option<&str> {
    let path = line.trim().strip_prefix("[ExtractAudio] Destination:")?.trim();
    if path.is_empty() {
        return None;
    }
    Path::new(path).file_name().and_then(|n| n.to_str())
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary with priority:
/// 1. Next to the executable
/// 2. System PATH
/// 3. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(adjacent) = find_adjacent_ytdlp() {
        info!("✓ Using adjacent yt-dlp: {:?}", adjacent);
        return Some(adjacent);
    }

    if let Ok(system) = which::which("yt-dlp") {
        info!("✓ Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("✓ Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("✗ yt-dlp not found anywhere!");
    None
}

fn find_adjacent_ytdlp() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path.parent()?.join(platform::ytdlp_binary_name());
    (candidate.is_file() && is_executable(&candidate)).then_some(candidate)
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // pip user install
        "~/.local/bin/yt-dlp",
    ];

    common_paths
        .iter()
        .map(|path_str| match path_str.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(path_str)),
            None => PathBuf::from(path_str),
        })
        .find(|path| path.exists() && is_executable(path))
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

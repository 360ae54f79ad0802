//! Application configuration

use crate::utils::error::PlayshelfError;
use crate::utils::platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application settings
///
/// Loaded from JSON. Every field is optional in the file; missing fields
/// take the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub fetcher: FetcherSettings,
    pub library: LibrarySettings,
}

/// Options passed through to yt-dlp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Explicit yt-dlp binary; discovered when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Prefix turning a bare playlist ID into a URL
    pub playlist_url_prefix: String,

    /// yt-dlp format selector
    pub format: String,

    /// Codec for `--audio-format`
    pub audio_format: String,

    /// `--audio-quality` value ("0" is best)
    pub audio_quality: String,

    /// Output template; the title is the shared base name of audio and thumbnail
    pub output_template: String,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            playlist_url_prefix: "https://www.youtube.com/playlist?list=".to_string(),
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "0".to_string(),
            output_template: "%(title)s.%(ext)s".to_string(),
        }
    }
}

/// Layout and naming rules of the local library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Extension of fetched audio (without dot)
    pub audio_extension: String,

    /// Extensions the fetcher writes thumbnails with
    pub thumbnail_extensions: Vec<String>,

    /// Canonical cover extension
    pub image_extension: String,

    pub audio_folder: String,
    pub albums_folder: String,
    pub covers_folder: String,

    /// Per-track name manifest
    pub names_manifest: String,

    /// Index list of the last batch
    pub playlist_file: String,

    /// Separator between artist and title in fetched file names
    pub name_delimiter: String,

    pub segment_order: SegmentOrder,
    pub parse_policy: ParsePolicy,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            audio_extension: "mp3".to_string(),
            thumbnail_extensions: vec!["webp".to_string()],
            image_extension: "jpg".to_string(),
            audio_folder: "audio".to_string(),
            albums_folder: "albums".to_string(),
            covers_folder: "covers".to_string(),
            names_manifest: "artist_title_names.txt".to_string(),
            playlist_file: "playlist.txt".to_string(),
            name_delimiter: "-".to_string(),
            segment_order: SegmentOrder::Reversed,
            parse_policy: ParsePolicy::Lenient,
        }
    }
}

/// Order in which name segments are written to the manifest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentOrder {
    /// Last segment first (`Title-Artist` is written Artist, Title)
    Reversed,
    #[serde(alias = "as_is", alias = "asis")]
    AsIs,
}

/// How malformed names are treated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ParsePolicy {
    /// Skip and warn
    Lenient,
    /// Fail the run
    Strict,
}

impl AppSettings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match platform::default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .map_err(PlayshelfError::from)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: AppSettings = serde_json::from_str(&json)
            .map_err(PlayshelfError::from)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the organizer cannot work with
    pub fn validate(&self) -> Result<(), PlayshelfError> {
        let lib = &self.library;
        let invalid =
            |msg: String| -> Result<(), PlayshelfError> { Err(PlayshelfError::InvalidConfig(msg)) };

        for ext in std::iter::once(&lib.audio_extension)
            .chain(std::iter::once(&lib.image_extension))
            .chain(lib.thumbnail_extensions.iter())
        {
            if ext.is_empty() || ext.contains('.') {
                return invalid(format!("extension {:?} must be non-empty and dot-free", ext));
            }
        }
        if lib.audio_extension.eq_ignore_ascii_case(&lib.image_extension) {
            return invalid("audio_extension and image_extension must differ".to_string());
        }
        if lib
            .thumbnail_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&lib.image_extension))
        {
            return invalid("image_extension must not be a thumbnail extension".to_string());
        }
        if lib.name_delimiter.is_empty() {
            return invalid("name_delimiter must not be empty".to_string());
        }

        let folders = [&lib.audio_folder, &lib.albums_folder, &lib.covers_folder];
        if folders.iter().any(|f| f.is_empty() || f.contains(['/', '\\'])) {
            return invalid("folder names must be non-empty single path components".to_string());
        }
        let unique: HashSet<_> = folders.iter().collect();
        if unique.len() != folders.len() {
            return invalid("audio, albums and covers folders must be distinct".to_string());
        }
        if lib.names_manifest == lib.playlist_file {
            return invalid("names_manifest and playlist_file must differ".to_string());
        }

        Ok(())
    }
}

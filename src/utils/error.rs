//! Error handling for playshelf

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for playshelf
#[derive(Debug, Error)]
pub enum PlayshelfError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Playlist fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid playlist identifier: {0:?}")]
    InvalidPlaylist(String),

    #[error("Track name has no artist/title delimiter: {0}")]
    MalformedTrackName(String),

    #[error("Archive file is not index-named: {0}")]
    UnindexedArchiveFile(String),

    #[error("Track index overflows past {0}")]
    IndexOverflow(u64),

    #[error("Refusing to overwrite existing file: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

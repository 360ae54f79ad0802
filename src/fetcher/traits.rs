use crate::fetcher::models::{FetchSummary, PlaylistRequest};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Capability that puts a playlist's audio and thumbnails on disk
///
/// Implementations write one audio file and one thumbnail per track into
/// `work_dir`, both named after the track title.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Returns a unique identifier for this fetcher (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Download every track of the playlist into `work_dir`
    async fn fetch_playlist(&self, request: &PlaylistRequest, work_dir: &Path)
        -> Result<FetchSummary>;
}

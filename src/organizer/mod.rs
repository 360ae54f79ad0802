//! Library organization: indexing, renaming, manifests and folder placement

pub mod allocator;
pub mod layout;
pub mod manifest;
pub mod names;
pub mod placement;
pub mod plan;
pub mod renamer;
pub mod snapshot;
pub mod thumbnails;

pub use layout::LibraryLayout;
pub use manifest::{ManifestEntry, ManifestPaths};
pub use plan::{BatchPlan, Track};
pub use snapshot::DirSnapshot;
pub use thumbnails::ThumbnailReport;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Organizer bound to one library root
#[derive(Debug, Clone)]
pub struct LibraryOrganizer {
    layout: LibraryLayout,
}

impl LibraryOrganizer {
    pub fn new(layout: LibraryLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    pub async fn normalize_thumbnails(&self) -> Result<ThumbnailReport> {
        thumbnails::normalize_thumbnails(&self.layout).await
    }

    /// First free archive index
    pub async fn next_index(&self) -> Result<u64> {
        allocator::next_index(&self.layout.audio_dir(), self.layout.settings().parse_policy).await
    }

    /// First index free in both the archive and the working directory.
    ///
    /// Index-named audio left in the root by an interrupted run still owns
    /// its index until placement moves it.
    pub async fn start_index(&self, snapshot: &DirSnapshot) -> Result<u64> {
        let archive = self.next_index().await?;
        let leftover =
            allocator::next_index_among_indexed(snapshot.with_extension(self.layout.audio_ext()))?;
        if leftover > archive {
            info!("Working directory holds indexed files up to {}", leftover - 1);
        }
        Ok(archive.max(leftover))
    }

    /// Snapshot the working directory and assign indexes to its tracks
    pub async fn prepare_batch(&self, playlist_label: &str) -> Result<BatchPlan> {
        let snapshot = DirSnapshot::capture(self.layout.root()).await?;
        let start = self.start_index(&snapshot).await?;
        BatchPlan::build(&self.layout, &snapshot, start, playlist_label)
    }

    /// Build the plan a run would execute, without touching any file
    pub async fn plan(&self, playlist_label: &str) -> Result<BatchPlan> {
        let settings = self.layout.settings();
        let snapshot = DirSnapshot::capture(self.layout.root())
            .await?
            .project_extensions(&settings.thumbnail_extensions, &settings.image_extension);
        let start = self.start_index(&snapshot).await?;
        BatchPlan::build(&self.layout, &snapshot, start, playlist_label)
    }

    /// Write both manifests for `plan`. An empty plan writes nothing.
    pub async fn write_manifests(&self, plan: &BatchPlan) -> Result<Option<ManifestPaths>> {
        if plan.is_empty() {
            info!("No new tracks, manifests left untouched");
            return Ok(None);
        }
        let paths = manifest::write_manifests(
            &self.layout.names_manifest_path(),
            &self.layout.playlist_file_path(),
            &plan.manifest_entries(),
        )
        .await?;
        Ok(Some(paths))
    }

    pub async fn rename_audio(&self, plan: &BatchPlan) -> Result<Vec<PathBuf>> {
        renamer::rename_audio(&self.layout, plan).await
    }

    pub async fn rename_covers(&self, plan: &BatchPlan) -> Result<Vec<PathBuf>> {
        renamer::rename_covers(&self.layout, plan).await
    }

    pub async fn move_audio(&self) -> Result<Vec<PathBuf>> {
        placement::move_into(
            self.layout.root(),
            &self.layout.audio_dir(),
            self.layout.audio_ext(),
        )
        .await
    }

    pub async fn move_covers(&self) -> Result<Vec<PathBuf>> {
        placement::move_into(
            self.layout.root(),
            &self.layout.covers_dir(),
            self.layout.image_ext(),
        )
        .await
    }
}

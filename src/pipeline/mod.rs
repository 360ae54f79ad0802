//! Linear fetch-and-organize pipeline
//!
//! Fetch → NormalizeThumbnails → WriteManifests → RenameAudio →
//! RenameCovers → MoveAudio → MoveCovers. Each stage relies on the one
//! before it; a failure stops the run where it is.

use crate::fetcher::{FetchSummary, MediaFetcher, PlaylistRequest};
use crate::organizer::{BatchPlan, LibraryOrganizer, ManifestPaths};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    NormalizeThumbnails,
    WriteManifests,
    RenameAudio,
    RenameCovers,
    MoveAudio,
    MoveCovers,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Fetch,
        Stage::NormalizeThumbnails,
        Stage::WriteManifests,
        Stage::RenameAudio,
        Stage::RenameCovers,
        Stage::MoveAudio,
        Stage::MoveCovers,
    ];

    /// Console line printed once the stage is done
    pub fn completion_message(&self) -> &'static str {
        match self {
            Stage::Fetch => "Downloaded all the audio files and covers",
            Stage::NormalizeThumbnails => "Normalized thumbnails and set aside album art",
            Stage::WriteManifests => "Wrote the name manifest and playlist index",
            Stage::RenameAudio => "Renamed audio files to their indexes",
            Stage::RenameCovers => "Renamed covers to their indexes",
            Stage::MoveAudio => "Moved the audio files into the archive",
            Stage::MoveCovers => "Moved the covers into the covers folder",
        }
    }
}

/// Sent after each stage finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    pub stage: Stage,
    /// Files the stage produced or touched
    pub files: usize,
}

/// Outcome of a full run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub fetch: Option<FetchSummary>,
    pub plan: Option<BatchPlan>,
    pub albums: Vec<String>,
    pub manifests: Option<ManifestPaths>,
    pub archived_audio: Vec<PathBuf>,
    pub archived_covers: Vec<PathBuf>,
}

pub struct Pipeline {
    organizer: LibraryOrganizer,
    fetcher: Option<Arc<dyn MediaFetcher>>,
}

impl Pipeline {
    /// Pipeline that can only [`organize`](Self::organize)
    pub fn new(organizer: LibraryOrganizer) -> Self {
        Self {
            organizer,
            fetcher: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn MediaFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn organizer(&self) -> &LibraryOrganizer {
        &self.organizer
    }

    /// Fetch `request` into the library root, then organize it
    pub async fn run(
        &self,
        request: &PlaylistRequest,
        playlist_label: &str,
        progress_tx: Option<mpsc::Sender<StageProgress>>,
    ) -> Result<PipelineReport> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No media fetcher configured"))?;

        info!("Fetching {} with {}", request.url, fetcher.id());
        let summary = fetcher
            .fetch_playlist(request, self.organizer.layout().root())
            .await?;
        report(&progress_tx, Stage::Fetch, summary.produced.len()).await;

        let mut result = self.organize(playlist_label, progress_tx).await?;
        result.fetch = Some(summary);
        Ok(result)
    }

    /// Organize files already in the library root (every stage but Fetch)
    pub async fn organize(
        &self,
        playlist_label: &str,
        progress_tx: Option<mpsc::Sender<StageProgress>>,
    ) -> Result<PipelineReport> {
        let org = &self.organizer;
        let mut result = PipelineReport::default();

        let thumbnails = org.normalize_thumbnails().await?;
        report(
            &progress_tx,
            Stage::NormalizeThumbnails,
            thumbnails.normalized.len(),
        )
        .await;
        result.albums = thumbnails.albums;

        let plan = org.prepare_batch(playlist_label).await?;
        info!(
            "Batch of {} tracks starting at index {}",
            plan.len(),
            plan.start_index
        );
        result.manifests = org.write_manifests(&plan).await?;
        report(&progress_tx, Stage::WriteManifests, plan.len()).await;

        let audio = org.rename_audio(&plan).await?;
        report(&progress_tx, Stage::RenameAudio, audio.len()).await;

        let covers = org.rename_covers(&plan).await?;
        report(&progress_tx, Stage::RenameCovers, covers.len()).await;

        result.archived_audio = org.move_audio().await?;
        report(&progress_tx, Stage::MoveAudio, result.archived_audio.len()).await;

        result.archived_covers = org.move_covers().await?;
        report(&progress_tx, Stage::MoveCovers, result.archived_covers.len()).await;

        result.plan = Some(plan);
        Ok(result)
    }
}

/// Best-effort progress send; a dropped receiver is not an error
async fn report(tx: &Option<mpsc::Sender<StageProgress>>, stage: Stage, files: usize) {
    debug!("Stage {:?} done ({} files)", stage, files);
    if let Some(tx) = tx {
        let _ = tx.send(StageProgress { stage, files }).await;
    }
}

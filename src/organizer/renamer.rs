//! Index-based renaming of tracks and covers

use crate::organizer::layout::LibraryLayout;
use crate::organizer::plan::BatchPlan;
use crate::utils::error::PlayshelfError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Rename `from` to `to`, failing instead of replacing an existing file
pub async fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    let taken = fs::try_exists(to)
        .await
        .with_context(|| format!("Failed to check {}", to.display()))?;
    if taken {
        return Err(PlayshelfError::TargetExists(to.to_path_buf()).into());
    }
    fs::rename(from, to)
        .await
        .with_context(|| format!("Failed to rename {} to {}", from.display(), to.display()))?;
    debug!("Renamed {} -> {}", from.display(), to.display());
    Ok(())
}

/// Rename each planned track to `<index>.<audio ext>`
pub async fn rename_audio(layout: &LibraryLayout, plan: &BatchPlan) -> Result<Vec<PathBuf>> {
    let mut renamed = Vec::with_capacity(plan.len());
    for track in &plan.tracks {
        let from = layout.root().join(&track.original_name);
        let to = layout.root().join(layout.indexed_audio_name(track.index));
        rename_no_clobber(&from, &to).await?;
        renamed.push(to);
    }
    Ok(renamed)
}

/// Rename each planned track's cover to `<index>.<image ext>`
pub async fn rename_covers(layout: &LibraryLayout, plan: &BatchPlan) -> Result<Vec<PathBuf>> {
    let mut renamed = Vec::new();
    for track in &plan.tracks {
        let Some(cover) = &track.cover else {
            continue;
        };
        let from = layout.root().join(cover);
        let to = layout.root().join(layout.indexed_image_name(track.index));
        rename_no_clobber(&from, &to).await?;
        renamed.push(to);
    }
    Ok(renamed)
}

//! Thumbnail extension normalization and album-asset separation

use crate::organizer::layout::LibraryLayout;
use crate::organizer::renamer::rename_no_clobber;
use crate::organizer::snapshot::{file_stem, DirSnapshot};
use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

/// What the normalizer changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailReport {
    /// Images renamed to the canonical extension (new names)
    pub normalized: Vec<String>,
    /// Images with no matching track, now in the albums folder
    pub albums: Vec<String>,
}

/// Rename native thumbnails to the canonical image extension, then move
/// every image without a same-stem audio file into the albums folder.
///
/// A thumbnail whose target name is taken stays where it is, the same way
/// [`DirSnapshot::project_extensions`] shows it in a dry run.
pub async fn normalize_thumbnails(layout: &LibraryLayout) -> Result<ThumbnailReport> {
    let root = layout.root();
    let mut report = ThumbnailReport::default();

    let before = DirSnapshot::capture(root).await?;
    let renames = before.extension_renames(
        &layout.settings().thumbnail_extensions,
        layout.image_ext(),
    );
    for (name, target) in renames {
        rename_no_clobber(&root.join(&name), &root.join(&target)).await?;
        report.normalized.push(target);
    }

    let albums_dir = layout.albums_dir();
    fs::create_dir_all(&albums_dir)
        .await
        .with_context(|| format!("Failed to create {}", albums_dir.display()))?;

    let after = DirSnapshot::capture(root).await?;
    for name in after.with_extension(layout.image_ext()) {
        if after.find(file_stem(name), layout.audio_ext()).is_some() {
            continue;
        }
        rename_no_clobber(&root.join(name), &albums_dir.join(name)).await?;
        debug!("Moved album asset {}", name);
        report.albums.push(name.to_string());
    }

    info!(
        "Normalized {} thumbnails, {} album assets",
        report.normalized.len(),
        report.albums.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::LibrarySettings;

    #[tokio::test]
    async fn test_normalize_and_separate_albums() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Song.mp3", "Song.webp", "Album Art.webp", "Loose.jpg"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let layout = LibraryLayout::new(dir.path(), LibrarySettings::default());

        let report = normalize_thumbnails(&layout).await.unwrap();

        assert_eq!(report.normalized, vec!["Album Art.jpg", "Song.jpg"]);
        assert_eq!(report.albums, vec!["Album Art.jpg", "Loose.jpg"]);
        assert!(dir.path().join("Song.jpg").exists());
        assert!(!dir.path().join("Song.webp").exists());
        assert!(dir.path().join("albums/Album Art.jpg").exists());
        assert!(dir.path().join("albums/Loose.jpg").exists());
    }

    #[tokio::test]
    async fn test_thumbnail_with_existing_image_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Song.mp3", "Song.webp", "Song.jpg"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let layout = LibraryLayout::new(dir.path(), LibrarySettings::default());

        let report = normalize_thumbnails(&layout).await.unwrap();

        assert!(report.normalized.is_empty());
        assert!(report.albums.is_empty());
        assert_eq!(std::fs::read_to_string(dir.path().join("Song.jpg")).unwrap(), "Song.jpg");
        assert!(dir.path().join("Song.webp").exists());
    }

    #[tokio::test]
    async fn test_albums_dir_created_even_when_unused() {
        let dir = tempfile::tempdir().unwrap();
        let layout = LibraryLayout::new(dir.path(), LibrarySettings::default());
        let report = normalize_thumbnails(&layout).await.unwrap();
        assert_eq!(report, ThumbnailReport::default());
        assert!(dir.path().join("albums").is_dir());
    }
}

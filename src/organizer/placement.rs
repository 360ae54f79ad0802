//! Moving organized files into their archive folders

use crate::organizer::renamer::rename_no_clobber;
use crate::organizer::snapshot::DirSnapshot;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Move every `ext` file of `root` into `dest`, creating `dest` if needed.
///
/// Running it again moves nothing.
pub async fn move_into(root: &Path, dest: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    let snapshot = DirSnapshot::capture(root).await?;
    let mut moved = Vec::new();
    for name in snapshot.with_extension(ext) {
        let target = dest.join(name);
        rename_no_clobber(&root.join(name), &target).await?;
        moved.push(target);
    }

    debug!("Moved {} .{} files into {}", moved.len(), ext, dest.display());
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_move_into_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("4.mp3"), b"a").unwrap();
        std::fs::write(dir.path().join("4.jpg"), b"c").unwrap();
        let dest = dir.path().join("audio");

        let moved = move_into(dir.path(), &dest, "mp3").await.unwrap();
        assert_eq!(moved, vec![dest.join("4.mp3")]);
        assert!(dir.path().join("4.jpg").exists());

        let again = move_into(dir.path(), &dest, "mp3").await.unwrap();
        assert!(again.is_empty());
        assert!(dest.join("4.mp3").exists());
    }

    #[tokio::test]
    async fn test_move_into_keeps_existing_archive_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("covers");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("1.jpg"), b"old").unwrap();
        std::fs::write(dir.path().join("1.jpg"), b"new").unwrap();

        assert!(move_into(dir.path(), &dest, "jpg").await.is_err());
        assert_eq!(std::fs::read(dest.join("1.jpg")).unwrap(), b"old");
    }
}

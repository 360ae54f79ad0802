//! Working-directory context shared by every organizer stage

use crate::utils::config::LibrarySettings;
use std::path::{Path, PathBuf};

/// Root of a library plus the naming rules applied inside it.
///
/// Every stage resolves paths through this value; the process working
/// directory is never consulted.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    root: PathBuf,
    settings: LibrarySettings,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &LibrarySettings {
        &self.settings
    }

    /// Persistent archive of index-named audio
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(&self.settings.audio_folder)
    }

    /// Images with no matching track
    pub fn albums_dir(&self) -> PathBuf {
        self.root.join(&self.settings.albums_folder)
    }

    pub fn covers_dir(&self) -> PathBuf {
        self.root.join(&self.settings.covers_folder)
    }

    pub fn names_manifest_path(&self) -> PathBuf {
        self.root.join(&self.settings.names_manifest)
    }

    pub fn playlist_file_path(&self) -> PathBuf {
        self.root.join(&self.settings.playlist_file)
    }

    pub fn audio_ext(&self) -> &str {
        &self.settings.audio_extension
    }

    pub fn image_ext(&self) -> &str {
        &self.settings.image_extension
    }

    /// `<index>.<audio ext>`
    pub fn indexed_audio_name(&self, index: u64) -> String {
        format!("{}.{}", index, self.settings.audio_extension)
    }

    /// `<index>.<image ext>`
    pub fn indexed_image_name(&self, index: u64) -> String {
        format!("{}.{}", index, self.settings.image_extension)
    }
}

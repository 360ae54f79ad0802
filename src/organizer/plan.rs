//! Batch plan: one snapshot, one index per track

use crate::organizer::allocator::is_indexed;
use crate::organizer::layout::LibraryLayout;
use crate::organizer::manifest::ManifestEntry;
use crate::organizer::names::{parse_segments, NameRules};
use crate::organizer::snapshot::{file_stem, DirSnapshot};
use crate::utils::error::PlayshelfError;
use anyhow::Result;

/// A fetched audio file and the index it will be archived under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub original_name: String,
    pub index: u64,
    pub segments: Vec<String>,
    /// Same-stem image in the working directory
    pub cover: Option<String>,
}

impl Track {
    pub fn stem(&self) -> &str {
        file_stem(&self.original_name)
    }
}

/// Everything the indexed stages need, fixed before any file is renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub start_index: u64,
    pub playlist_label: String,
    pub tracks: Vec<Track>,
}

impl BatchPlan {
    /// Pair every not-yet-indexed audio file in `snapshot` with
    /// `start_index`, `start_index + 1`, ... in snapshot order.
    pub fn build(
        layout: &LibraryLayout,
        snapshot: &DirSnapshot,
        start_index: u64,
        playlist_label: &str,
    ) -> Result<Self> {
        let settings = layout.settings();
        let rules = NameRules {
            delimiter: &settings.name_delimiter,
            audio_ext: layout.audio_ext(),
            order: settings.segment_order,
            policy: settings.parse_policy,
        };

        let mut tracks = Vec::new();
        for name in snapshot.with_extension(layout.audio_ext()) {
            if is_indexed(name) {
                continue;
            }
            let stem = file_stem(name);
            let index = start_index
                .checked_add(tracks.len() as u64)
                .ok_or(PlayshelfError::IndexOverflow(start_index))?;
            tracks.push(Track {
                original_name: name.to_string(),
                index,
                segments: parse_segments(stem, &rules)?,
                cover: snapshot.find(stem, layout.image_ext()).map(str::to_string),
            });
        }

        Ok(Self {
            start_index,
            playlist_label: playlist_label.to_string(),
            tracks,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn indexes(&self) -> Vec<u64> {
        self.tracks.iter().map(|t| t.index).collect()
    }

    pub fn manifest_entries(&self) -> Vec<ManifestEntry> {
        self.tracks
            .iter()
            .map(|track| ManifestEntry {
                index: track.index,
                segments: track.segments.clone(),
                playlist_label: self.playlist_label.clone(),
            })
            .collect()
    }
}

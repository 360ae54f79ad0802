//! Artist/title segment parsing from fetched file names

use crate::utils::config::{ParsePolicy, SegmentOrder};
use crate::utils::error::PlayshelfError;
use anyhow::Result;
use tracing::warn;

/// Rules for turning a file stem into manifest segments
#[derive(Debug, Clone, Copy)]
pub struct NameRules<'a> {
    pub delimiter: &'a str,
    pub audio_ext: &'a str,
    pub order: SegmentOrder,
    pub policy: ParsePolicy,
}

/// Split `stem` into trimmed name segments in manifest order.
///
/// Empty segments are dropped. A stem without the delimiter becomes one
/// segment (lenient) or an error (strict).
pub fn parse_segments(stem: &str, rules: &NameRules<'_>) -> Result<Vec<String>> {
    if !stem.contains(rules.delimiter) {
        match rules.policy {
            ParsePolicy::Lenient => warn!("No {:?} in track name {:?}", rules.delimiter, stem),
            ParsePolicy::Strict => {
                return Err(PlayshelfError::MalformedTrackName(stem.to_string()).into())
            }
        }
    }

    let mut segments: Vec<String> = stem
        .split(rules.delimiter)
        .map(|segment| clean_segment(segment, rules.audio_ext))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        segments.push(stem.trim().to_string());
    }
    if rules.order == SegmentOrder::Reversed {
        segments.reverse();
    }

    Ok(segments)
}

/// Trim whitespace and a leftover `.<ext>` suffix
fn clean_segment(segment: &str, audio_ext: &str) -> String {
    let trimmed = segment.trim();
    let suffix_len = audio_ext.len() + 1;
    if trimmed.len() > suffix_len && trimmed.is_char_boundary(trimmed.len() - suffix_len) {
        let (head, tail) = trimmed.split_at(trimmed.len() - suffix_len);
        if tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(audio_ext) {
            return head.trim_end().to_string();
        }
    }
    trimmed.to_string()
}

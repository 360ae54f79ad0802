//! Next-index allocation over the audio archive

use crate::organizer::snapshot::{file_stem, DirSnapshot};
use crate::utils::config::ParsePolicy;
use crate::utils::error::PlayshelfError;
use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Parse an index-named stem. Only plain ASCII digits count.
pub fn parse_index(stem: &str) -> Option<u64> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Whether `name` is already `<index>.<ext>`
pub fn is_indexed(name: &str) -> bool {
    parse_index(file_stem(name)).is_some()
}

/// One past the highest index among `names`, or 0 when none is numeric.
///
/// Under [`ParsePolicy::Lenient`] non-numeric names are logged and skipped;
/// under [`ParsePolicy::Strict`] the first one fails the allocation.
pub fn next_index_from<'a, I>(names: I, policy: ParsePolicy) -> Result<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut highest: Option<u64> = None;

    for name in names {
        match parse_index(file_stem(name)) {
            Some(index) => highest = Some(highest.map_or(index, |h| h.max(index))),
            None => match policy {
                ParsePolicy::Lenient => warn!("Ignoring non-indexed archive file: {}", name),
                ParsePolicy::Strict => {
                    return Err(PlayshelfError::UnindexedArchiveFile(name.to_string()).into())
                }
            },
        }
    }

    match highest {
        Some(h) => Ok(h.checked_add(1).ok_or(PlayshelfError::IndexOverflow(h))?),
        None => Ok(0),
    }
}

/// One past the highest bare-integer `<stem>.<ext>` in `names`, or 0.
/// Names that are not index-named are skipped silently.
pub fn next_index_among_indexed<'a, I>(names: I) -> Result<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    next_index_from(names.into_iter().filter(|n| is_indexed(n)), ParsePolicy::Lenient)
}

/// Scan `archive_dir` and return the first free index
pub async fn next_index(archive_dir: &Path, policy: ParsePolicy) -> Result<u64> {
    let snapshot = DirSnapshot::capture(archive_dir).await?;
    let next = next_index_from(snapshot.names().iter().map(String::as_str), policy)?;
    debug!(
        "Archive {} holds {} files, next index {}",
        archive_dir.display(),
        snapshot.len(),
        next
    );
    Ok(next)
}

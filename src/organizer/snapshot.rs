//! Single ordered listing of a directory's regular files

use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Sorted names of the regular files in one directory, taken once.
///
/// Indexed stages read from a snapshot instead of re-listing, so the
/// order that pairs files with indexes cannot shift between passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSnapshot {
    names: Vec<String>,
}

impl DirSnapshot {
    /// List `dir`. A missing directory yields an empty snapshot.
    pub async fn capture(dir: &Path) -> Result<Self> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist, empty snapshot", dir.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list {}", dir.display()))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", dir.display()))?
        {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }

        Ok(Self::from_names(names))
    }

    /// Build a snapshot from known names (sorted, deduplicated)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names carrying `ext`, in snapshot order
    pub fn with_extension<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.names
            .iter()
            .map(String::as_str)
            .filter(move |name| has_extension(name, ext))
    }

    /// First name whose stem is `stem` and whose extension is `ext`
    pub fn find(&self, stem: &str, ext: &str) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|name| matches!(split_extension(name), Some((s, e)) if s == stem && e.eq_ignore_ascii_case(ext)))
    }

    /// Planned `(from, to)` renames of every `from`-extension name to `to`.
    ///
    /// Taken in snapshot order. A name whose target stem already has a `to`
    /// file, or was claimed by an earlier rename, is kept and logged.
    pub fn extension_renames(&self, from: &[String], to: &str) -> Vec<(String, String)> {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut renames = Vec::new();
        for name in &self.names {
            let Some((stem, ext)) = split_extension(name) else {
                continue;
            };
            if !from.iter().any(|f| f.eq_ignore_ascii_case(ext)) {
                continue;
            }
            let target = format!("{}.{}", stem, to);
            if self.find(stem, to).is_some() || !claimed.insert(stem) {
                warn!("Keeping {}, {} is already taken", name, target);
                continue;
            }
            renames.push((name.clone(), target));
        }
        renames
    }

    /// The snapshot as it would read after [`extension_renames`](Self::extension_renames)
    pub fn project_extensions(&self, from: &[String], to: &str) -> Self {
        let renames: HashMap<String, String> =
            self.extension_renames(from, to).into_iter().collect();
        Self::from_names(
            self.names
                .iter()
                .map(|name| renames.get(name).unwrap_or(name).clone()),
        )
    }
}

/// Split `name` into stem and extension at the last dot.
///
/// Dotfiles such as `.mp3` have no extension.
pub fn split_extension(name: &str) -> Option<(&str, &str)> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) => Some((&name[..pos], &name[pos + 1..])),
    }
}

/// Name without its extension
pub fn file_stem(name: &str) -> &str {
    split_extension(name).map(|(stem, _)| stem).unwrap_or(name)
}

/// ASCII case-insensitive extension check
pub fn has_extension(name: &str, ext: &str) -> bool {
    split_extension(name)
        .map(|(_, e)| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

//! Data structures for playlist fetching

use crate::utils::error::PlayshelfError;
use serde::{Deserialize, Serialize};

/// A playlist to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    /// What the user typed (ID or URL)
    pub input: String,
    /// URL handed to the fetcher
    pub url: String,
}

impl PlaylistRequest {
    /// Accept a bare playlist ID or a full http(s) URL
    pub fn from_input(input: &str, url_prefix: &str) -> Result<Self, PlayshelfError> {
        let input = input.trim();
        if input.is_empty() || input.chars().any(char::is_whitespace) {
            return Err(PlayshelfError::InvalidPlaylist(input.to_string()));
        }

        let url = if input.starts_with("https://") || input.starts_with("http://") {
            input.to_string()
        } else {
            format!("{}{}", url_prefix, input)
        };

        Ok(Self {
            input: input.to_string(),
            url,
        })
    }
}

/// What the fetcher reported producing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    /// Audio files written into the working directory
    pub produced: Vec<String>,
}

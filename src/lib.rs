//! playshelf library

pub mod fetcher;
pub mod organizer;
pub mod pipeline;
pub mod utils;

// Re-export main types for easier use
pub use fetcher::{FetchSummary, MediaFetcher, PlaylistRequest, YtDlpFetcher};
pub use organizer::{BatchPlan, LibraryLayout, LibraryOrganizer, Track};
pub use pipeline::{Pipeline, PipelineReport, Stage, StageProgress};
pub use utils::{AppSettings, PlayshelfError};

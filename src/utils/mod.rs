//! Utility modules for error handling and configuration

pub mod config;
pub mod error;
pub mod platform;

// Re-export for convenience
pub use config::{AppSettings, FetcherSettings, LibrarySettings, ParsePolicy, SegmentOrder};
pub use error::PlayshelfError;

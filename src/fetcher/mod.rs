pub mod models;
pub mod traits;
pub mod ytdlp;

pub use models::{FetchSummary, PlaylistRequest};
pub use traits::MediaFetcher;
pub use ytdlp::YtDlpFetcher;

//! Platform-specific paths and binary names

use std::path::PathBuf;

/// Directory name used under the platform config dir
const APP_DIR: &str = "playshelf";

/// Returns `<config_dir>/playshelf/settings.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("settings.json"))
}

/// File name of the yt-dlp executable on this platform
pub fn ytdlp_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_naming() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("playshelf/settings.json"));
        }
    }

    #[test]
    fn test_binary_name() {
        assert!(ytdlp_binary_name().starts_with("yt-dlp"));
        assert_eq!(ytdlp_binary_name().ends_with(".exe"), cfg!(target_os = "windows"));
    }
}

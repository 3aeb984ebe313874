//! Download and session cache locations.

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};

use crate::error::Result;

/// File name of the persisted session cache.
const CACHE_FILE_NAME: &str = "session-cache.json";

/// The user's download directory, or the current directory when unknown.
pub fn default_download_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Location of the session cache file under the platform cache directory.
pub fn default_cache_file() -> PathBuf {
    ProjectDirs::from("", "", "tweet-media-dl")
        .map(|dirs| dirs.cache_dir().join(CACHE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CACHE_FILE_NAME))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_file_name() {
        assert!(default_cache_file().ends_with(CACHE_FILE_NAME));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}

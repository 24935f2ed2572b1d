//! Default path helpers.
//! Determines the default watch root and the fixed file names kept inside it.

use dirs::{download_dir, home_dir};
use std::path::{Path, PathBuf};

use super::{ARCHIVE_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME, MARKER_FILE_NAME};

/// OS-appropriate default watch root (the user's Downloads folder).
pub fn default_root() -> Option<PathBuf> {
    download_dir().or_else(|| home_dir().map(|h| h.join("Downloads")))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

pub fn marker_path(root: &Path) -> PathBuf {
    root.join(MARKER_FILE_NAME)
}

pub fn log_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE_NAME)
}

pub fn archive_dir(root: &Path) -> PathBuf {
    root.join(ARCHIVE_DIR_NAME)
}

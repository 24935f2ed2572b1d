//! Skip rules applied before a file enters the pipeline.
//! - Temporary download artifacts (browser/aria2 partial files) are never tracked.
//! - Configured exact names and case-insensitive patterns exclude a file from organizing.

use std::path::Path;
use tracing::trace;

use crate::classify::extension_of;
use crate::config::Config;

/// Extensions downloaders use for files that are still being written.
pub const TEMP_EXTENSIONS: &[&str] = &[
    ".crdownload",
    ".part",
    ".partial",
    ".tmp",
    ".download",
    ".aria2",
    ".opdownload",
];

/// True for in-progress download artifacts.
pub fn is_temporary(path: &Path) -> bool {
    let ext = extension_of(path);
    let temp = TEMP_EXTENSIONS.contains(&ext.as_str());
    if temp {
        trace!(path = %path.display(), ext, "temporary download artifact");
    }
    temp
}

/// True if the base name is listed verbatim in `excluded_files`, or any
/// `excluded_patterns` regex matches somewhere in it.
pub fn is_excluded(path: &Path, config: &Config) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();

    if config.excluded_files.iter().any(|n| n.as_str() == name) {
        return true;
    }
    config.excluded_patterns.iter().any(|re| re.is_match(&name))
}

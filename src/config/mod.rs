//! Config module.
//! Provides configuration types, fixed file names under the watch root, JSON loading,
//! and the startup load-or-create step.

pub mod json;
pub mod paths;
pub mod types;

pub use json::{ConfigFile, load_config_from_path, write_config};
pub use paths::{archive_dir, config_path, default_root, log_path, marker_path};
pub use types::{CategoryMap, Config, LogLevel};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Sentinel whose presence means the first-run archive pass already happened.
pub const MARKER_FILE_NAME: &str = ".organized";
pub const CONFIG_FILE_NAME: &str = ".download_organizer.json";
pub const LOG_FILE_NAME: &str = "download_organizer.log";
pub const ARCHIVE_DIR_NAME: &str = "old_download";

/// True for the organizer's own files and folder inside the root.
pub fn is_reserved_name(name: &OsStr) -> bool {
    [ARCHIVE_DIR_NAME, MARKER_FILE_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME]
        .iter()
        .any(|n| name == *n)
}

/// How the config for this run was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Existing file parsed (missing keys filled from defaults).
    Loaded,
    /// No file existed (or a reset was requested); defaults were written.
    CreatedDefault,
    /// The file could not be parsed; defaults are used for this run and the file is left alone.
    Fallback(String),
}

/// Result of [`load_or_init`]: the config plus anything worth logging once tracing is up.
#[derive(Debug)]
pub struct LoadReport {
    pub config: Config,
    pub path: PathBuf,
    pub status: LoadStatus,
    /// Normalisation notes (bad values replaced, duplicate extensions, invalid patterns).
    pub notes: Vec<String>,
    /// Set when writing defaults failed; the run continues with in-memory defaults.
    pub write_error: Option<String>,
}

/// Load `<root>/.download_organizer.json`, creating it with defaults when missing.
///
/// - `reset`: discard any existing file and write defaults.
/// - A malformed file never aborts startup: defaults are used for this run.
///
/// Runs before logging is initialised, so everything noteworthy is returned in the report.
pub fn load_or_init(root: &Path, reset: bool) -> LoadReport {
    let path = config_path(root);

    let (file, status) = if reset || !path.exists() {
        (ConfigFile::default(), LoadStatus::CreatedDefault)
    } else {
        match load_config_from_path(&path) {
            Ok(file) => (file, LoadStatus::Loaded),
            Err(e) => (ConfigFile::default(), LoadStatus::Fallback(format!("{e:#}"))),
        }
    };

    let write_error = if status == LoadStatus::CreatedDefault {
        write_config(&path, &file).err().map(|e| format!("{e:#}"))
    } else {
        None
    };

    let (config, notes) = Config::from_file(&file);
    LoadReport {
        config,
        path,
        status,
        notes,
        write_error,
    }
}

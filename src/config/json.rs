//! JSON sidecar configuration support.
//! - Loads settings from `<root>/.download_organizer.json` (serde_json).
//! - Missing keys fall back to built-in defaults; unknown keys are kept and written back.
//! - Writes go through a temp sibling + rename so a crash never leaves a half-written file.
//!
//! Notes:
//! - This module only reads/writes the file; turning values into a runtime Config
//!   happens in `types::Config::from_file`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk shape of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub organize_by_date: bool,
    pub organize_by_type: bool,
    pub delay_seconds: f64,
    pub excluded_files: Vec<String>,
    pub excluded_patterns: Vec<String>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub log_level: String,
    pub keep_original_name: bool,
    pub rename_duplicates: bool,
    pub max_retry_attempts: i64,
    pub retry_delay_seconds: f64,
    /// Keys we do not know about; preserved on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".heic", ".tiff", ".ico"],
    ),
    (
        "documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".csv", ".ppt",
            ".pptx", ".md", ".epub",
        ],
    ),
    ("videos", &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".webm", ".flv", ".m4v"]),
    ("audio", &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a", ".wma", ".opus"]),
    ("archives", &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".tgz"]),
    (
        "installers",
        &[".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm", ".appimage", ".apk"],
    ),
    (
        "code",
        &[
            ".py", ".rs", ".js", ".ts", ".html", ".css", ".json", ".xml", ".yaml", ".yml", ".sh",
            ".c", ".cpp", ".h", ".java", ".go",
        ],
    ),
    ("disk_images", &[".iso", ".img"]),
    ("torrents", &[".torrent"]),
];

impl Default for ConfigFile {
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(label, exts)| {
                (
                    (*label).to_string(),
                    exts.iter().map(|e| (*e).to_string()).collect(),
                )
            })
            .collect();
        Self {
            organize_by_date: true,
            organize_by_type: true,
            delay_seconds: 5.0,
            excluded_files: vec![
                super::MARKER_FILE_NAME.to_string(),
                super::CONFIG_FILE_NAME.to_string(),
                super::LOG_FILE_NAME.to_string(),
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                "desktop.ini".to_string(),
            ],
            excluded_patterns: vec![r"^~\$".to_string(), r"^\.~lock\.".to_string()],
            categories,
            log_level: "info".to_string(),
            keep_original_name: true,
            rename_duplicates: true,
            max_retry_attempts: 3,
            retry_delay_seconds: 2.0,
            extra: Map::new(),
        }
    }
}

/// Load a ConfigFile from a specific JSON path.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config json '{}'", path.display()))?;
    let parsed: ConfigFile = serde_json::from_str(&contents)
        .with_context(|| format!("parse config json '{}'", path.display()))?;
    debug!(path = %path.display(), unknown_keys = parsed.extra.len(), "Parsed config file");
    Ok(parsed)
}

/// Write a ConfigFile as pretty JSON, replacing any existing file atomically.
pub fn write_config(path: &Path, file: &ConfigFile) -> Result<()> {
    let mut body = serde_json::to_string_pretty(file).context("serialize config json")?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body.as_bytes())
        .with_context(|| format!("write temporary config '{}'", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("replace config '{}'", path.display()));
    }
    Ok(())
}

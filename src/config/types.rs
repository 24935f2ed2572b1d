//! Core configuration types.
//! - Config holds the resolved, immutable-per-run settings.
//! - CategoryMap indexes extensions to category labels.
//! - LogLevel represents verbosity with simple parsing helpers.

use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::json::ConfigFile;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    /// Informational output (default)
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "critical" | "quiet" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" | "normal" => Some(LogLevel::Info),
            "debug" | "verbose" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Category label -> lowercase extensions (with leading dot).
///
/// Categories are kept in name order. When an extension is listed under more than
/// one category, the first category in that order owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: BTreeMap<String, BTreeSet<String>>,
    index: HashMap<String, String>,
}

impl CategoryMap {
    /// Build from raw lists. Returns the map plus human-readable notes about
    /// normalised or conflicting entries.
    pub fn build(raw: &BTreeMap<String, Vec<String>>) -> (Self, Vec<String>) {
        let mut map = CategoryMap::default();
        let mut notes = Vec::new();

        for (label, exts) in raw {
            let label = label.trim();
            if label.is_empty() {
                notes.push("ignoring category with an empty name".to_string());
                continue;
            }
            let set = map.categories.entry(label.to_string()).or_default();
            for ext in exts {
                let Some(norm) = normalize_extension(ext) else {
                    notes.push(format!("category '{label}': ignoring empty extension"));
                    continue;
                };
                match map.index.get(&norm) {
                    Some(owner) if owner != label => {
                        notes.push(format!(
                            "extension '{norm}' is listed under both '{owner}' and '{label}'; using '{owner}'"
                        ));
                        continue;
                    }
                    Some(_) => {}
                    None => {
                        map.index.insert(norm.clone(), label.to_string());
                    }
                }
                set.insert(norm);
            }
        }
        (map, notes)
    }

    /// Category owning `ext` (lowercase, with dot). Case-insensitive.
    pub fn category_for(&self, ext: &str) -> Option<&str> {
        if ext.is_empty() {
            return None;
        }
        self.index.get(&ext.to_lowercase()).map(String::as_str)
    }

    pub fn extensions(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    let bare = trimmed.trim_start_matches('.');
    if bare.is_empty() {
        None
    } else {
        Some(format!(".{bare}"))
    }
}

/// Runtime configuration for one run of the organizer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nest destinations under `YYYY-MM-DD`
    pub organize_by_date: bool,
    /// Nest destinations under the category label
    pub organize_by_type: bool,
    /// Initial wait before sampling a new file's size
    pub delay: Duration,
    /// Base names skipped verbatim (case-sensitive)
    pub excluded_files: Vec<String>,
    /// Case-insensitive search patterns on base names
    pub excluded_patterns: Vec<Regex>,
    pub categories: CategoryMap,
    pub log_level: LogLevel,
    /// Carried for compatibility; names are always kept apart from duplicate counters
    pub keep_original_name: bool,
    /// Append " (n)" on destination collisions instead of skipping the file
    pub rename_duplicates: bool,
    /// Total move attempts (>= 1)
    pub max_retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        // Built-in defaults are valid by construction; notes are always empty here.
        let (cfg, _notes) = Config::from_file(&ConfigFile::default());
        cfg
    }
}

impl Config {
    /// Resolve a parsed config file into runtime settings.
    /// Invalid values fall back to defaults; each fallback yields a note for the log.
    pub fn from_file(file: &ConfigFile) -> (Self, Vec<String>) {
        let defaults = ConfigFile::default();
        let mut notes = Vec::new();

        let delay = seconds(file.delay_seconds, "delay_seconds", &mut notes)
            .unwrap_or_else(|| Duration::from_secs_f64(defaults.delay_seconds));
        let retry_delay = seconds(file.retry_delay_seconds, "retry_delay_seconds", &mut notes)
            .unwrap_or_else(|| Duration::from_secs_f64(defaults.retry_delay_seconds));

        let max_retry_attempts = if file.max_retry_attempts < 1 {
            notes.push(format!(
                "max_retry_attempts must be at least 1 (got {}); using 1",
                file.max_retry_attempts
            ));
            1
        } else {
            u32::try_from(file.max_retry_attempts).unwrap_or(u32::MAX)
        };

        let log_level = LogLevel::parse(&file.log_level).unwrap_or_else(|| {
            notes.push(format!(
                "unknown log_level '{}'; using {}",
                file.log_level,
                LogLevel::default()
            ));
            LogLevel::default()
        });

        let mut excluded_patterns = Vec::with_capacity(file.excluded_patterns.len());
        for pat in &file.excluded_patterns {
            match RegexBuilder::new(pat).case_insensitive(true).build() {
                Ok(re) => excluded_patterns.push(re),
                Err(e) => notes.push(format!("dropping invalid excluded pattern '{pat}': {e}")),
            }
        }

        let (categories, category_notes) = CategoryMap::build(&file.categories);
        notes.extend(category_notes);

        let cfg = Self {
            organize_by_date: file.organize_by_date,
            organize_by_type: file.organize_by_type,
            delay,
            excluded_files: file.excluded_files.clone(),
            excluded_patterns,
            categories,
            log_level,
            keep_original_name: file.keep_original_name,
            rename_duplicates: file.rename_duplicates,
            max_retry_attempts,
            retry_delay,
        };
        (cfg, notes)
    }
}

fn seconds(value: f64, key: &str, notes: &mut Vec<String>) -> Option<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(d) => Some(d),
        Err(_) => {
            notes.push(format!("{key} must be a non-negative number (got {value}); using default"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn extensions_are_normalised() {
        let (map, notes) = CategoryMap::build(&raw(&[("images", &["PNG", ".JpG", " .gif "])]));
        assert!(notes.is_empty());
        assert_eq!(map.category_for(".png"), Some("images"));
        assert_eq!(map.category_for(".JPG"), Some("images"));
        assert_eq!(map.category_for(".gif"), Some("images"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.labels().collect::<Vec<_>>(), vec!["images"]);
        assert!(CategoryMap::default().is_empty());
    }

    #[test]
    fn duplicate_extension_goes_to_first_category_by_name() {
        let (map, notes) = CategoryMap::build(&raw(&[
            ("zips", &[".zip"]),
            ("archives", &[".zip", ".7z"]),
        ]));
        assert_eq!(map.category_for(".zip"), Some("archives"));
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("'.zip'"));
    }

    #[test]
    fn empty_extension_never_matches() {
        let (map, notes) = CategoryMap::build(&raw(&[("misc", &["", "."])]));
        assert_eq!(notes.len(), 2);
        assert_eq!(map.category_for(""), None);
    }

    #[test]
    fn loglevel_parse_accepts_common_names() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("Info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("critical"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("trace".parse::<LogLevel>().is_ok());
    }

    #[test]
    fn bad_numbers_fall_back_with_notes() {
        let file = ConfigFile {
            delay_seconds: -3.0,
            max_retry_attempts: 0,
            excluded_patterns: vec!["(".into(), "^~\\$".into()],
            ..ConfigFile::default()
        };
        let (cfg, notes) = Config::from_file(&file);
        assert_eq!(cfg.delay, Duration::from_secs(5));
        assert_eq!(cfg.max_retry_attempts, 1);
        assert_eq!(cfg.excluded_patterns.len(), 1);
        assert_eq!(notes.len(), 3);
    }
}

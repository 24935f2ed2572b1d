//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - `--downloads` takes precedence over the positional DIR.
//! - `--debug` is a shorthand for `--log-level debug`.

use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, LogLevel, default_root};

/// Watch a downloads folder and file new arrivals by date and type.
/// CLI flags override values from the config file in the watched folder.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Watch a downloads folder and organize new files into dated/category folders"
)]
pub struct Args {
    /// Folder to watch (positional form of --downloads).
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub root_pos: Option<PathBuf>,

    /// Folder to watch. Defaults to the user's Downloads folder.
    #[arg(
        long = "downloads",
        short = 'd',
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        help = "Folder to watch (default: ~/Downloads)"
    )]
    pub downloads: Option<PathBuf>,

    /// Discard the existing config file and write fresh defaults.
    #[arg(long, help = "Discard the existing config file and regenerate defaults")]
    pub reset_config: bool,

    /// Seconds to wait after a file appears before checking its size.
    #[arg(long, value_name = "SECONDS", help = "Override delay_seconds for this run")]
    pub delay: Option<f64>,

    /// Set log level. One of: error, warn, info, debug, trace.
    #[arg(long, help = "Set log level: error, warn, info, debug, trace")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Emit logs in structured JSON.
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Log to the console only.
    #[arg(long, help = "Do not write the log file inside the watched folder")]
    pub no_log_file: bool,
}

impl Args {
    /// Effective watch root.
    ///
    /// Precedence:
    /// 1) `--downloads`
    /// 2) positional `DIR`
    /// 3) the platform Downloads folder
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.downloads
            .as_deref()
            .or(self.root_pos.as_deref())
            .map(|p| Self::sanitize_str(&p.to_string_lossy()))
            .or_else(default_root)
    }

    fn sanitize_str(s: &str) -> PathBuf {
        // Trim quotes left behind by PowerShell/CMD quoting.
        let trimmed = s.trim().trim_matches(|c| c == '\'' || c == '"');

        if trimmed == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        } else if let Some(rest) = trimmed
            .strip_prefix("~/")
            .or_else(|| trimmed.strip_prefix("~\\"))
        {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(trimmed)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(d) = self.delay.and_then(|secs| Duration::try_from_secs_f64(secs).ok()) {
            cfg.delay = d;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

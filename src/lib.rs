//! Core library for `download_organizer`.
//!
//! Watches a downloads directory, waits for new files to finish writing and files
//! them under `<root>/<date>/<category>/`. The binary in `main.rs` is a thin shell
//! around the pieces exported here: config loading, classification, the per-file
//! pipeline and the first-run archive pass.

pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod fs_ops;
pub mod organizer;
pub mod output;
pub mod platform;
pub mod shutdown;
pub mod stats;
pub mod watch;

pub use classify::{OTHER_CATEGORY, classify, extension_of};
pub use config::{CategoryMap, Config, LoadStatus, LogLevel, load_or_init};
pub use errors::OrganizerError;
pub use filter::{is_excluded, is_temporary};
pub use fs_ops::{
    ArchiveReport, Mover, SettleDetector, SettleOutcome, ensure_archived, resolve, resolve_with,
};
pub use organizer::{HandleOutcome, Organizer};
pub use shutdown::Shutdown;
pub use stats::{Stats, StatsSnapshot};
pub use watch::{CreatedEvent, DirWatcher};

//! Filesystem operations: destination naming, settle detection, moving and the
//! first-run archive pass.

mod archive;
mod atomic;
mod duplicate;
mod helpers;
mod mover;
mod resolve;
mod settle;

pub use archive::{ArchiveReport, ensure_archived};
pub use atomic::relocate;
pub use duplicate::{OnDuplicate, resolve_destination};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use mover::Mover;
pub use resolve::{date_folder_name, destination_dir, pick_name, resolve, resolve_with};
pub use settle::{
    LOCK_RETRY_DELAY, MAX_LOCK_RETRIES, POLL_INTERVAL, SettleDetector, SettleOutcome,
};

//! Typed error definitions for download_organizer.
//! A small set of well-known failure modes so per-file problems log cleanly and tests can match on them.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("Watch root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Source vanished before it could be moved: {0}")]
    SourceVanished(PathBuf),

    #[error("Destination already exists, leaving source in place: {0}")]
    DestinationExists(PathBuf),

    #[error("Could not prepare destination for {src}: {source}")]
    Destination {
        src: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move {src} -> {dest} after {attempts} attempt(s): {source}")]
    MoveFailed {
        src: PathBuf,
        dest: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("Operation interrupted by shutdown")]
    Interrupted,
}

impl OrganizerError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            OrganizerError::RootNotDirectory(_) => 10,
            OrganizerError::SourceVanished(_) => 20,
            OrganizerError::DestinationExists(_) => 21,
            OrganizerError::MoveFailed { .. } => 22,
            OrganizerError::Destination { .. } => 23,
            OrganizerError::Interrupted => 130,
        }
    }
}

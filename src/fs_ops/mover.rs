//! Move with bounded retry.
//! Transient failures (locks, temporary permission denial) are retried after a delay;
//! anything else fails at once. The source is never deleted on failure and nothing is
//! left at the destination. Statistics are recorded exactly once, on success.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::OrganizerError;
use crate::platform::is_transient;
use crate::shutdown::Shutdown;
use crate::stats::Stats;

use super::atomic::relocate;

#[derive(Debug, Clone)]
pub struct Mover {
    max_attempts: u32,
    retry_delay: Duration,
    shutdown: Shutdown,
}

impl Mover {
    pub fn new(max_attempts: u32, retry_delay: Duration, shutdown: Shutdown) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
            shutdown,
        }
    }

    pub fn from_config(config: &Config, shutdown: Shutdown) -> Self {
        Self::new(config.max_retry_attempts, config.retry_delay, shutdown)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Move `src` to `dest`, counting it under `category` on success.
    pub fn move_with_retry(
        &self,
        src: &Path,
        dest: &Path,
        category: &str,
        stats: &Stats,
    ) -> Result<PathBuf, OrganizerError> {
        self.move_with_retry_using(src, dest, category, stats, relocate)
    }

    /// Same as [`Mover::move_with_retry`] with an explicit relocation step.
    pub fn move_with_retry_using<F>(
        &self,
        src: &Path,
        dest: &Path,
        category: &str,
        stats: &Stats,
        mut relocate: F,
    ) -> Result<PathBuf, OrganizerError>
    where
        F: FnMut(&Path, &Path) -> io::Result<()>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let err = match relocate(src, dest) {
                Ok(()) => {
                    stats.record(category);
                    info!(src = %src.display(), dest = %dest.display(), category, attempt, "Moved file");
                    return Ok(dest.to_path_buf());
                }
                Err(e) => e,
            };

            // relocate() refuses to replace an existing destination.
            if err.kind() == io::ErrorKind::AlreadyExists {
                return Err(OrganizerError::DestinationExists(dest.to_path_buf()));
            }
            if src.symlink_metadata().is_err() {
                return Err(OrganizerError::SourceVanished(src.to_path_buf()));
            }
            if !is_transient(&err) || attempt >= self.max_attempts {
                return Err(OrganizerError::MoveFailed {
                    src: src.to_path_buf(),
                    dest: dest.to_path_buf(),
                    attempts: attempt,
                    source: err,
                });
            }

            warn!(
                src = %src.display(),
                error = %err,
                attempt,
                max = self.max_attempts,
                "Move failed; retrying in {:?}",
                self.retry_delay
            );
            if !self.shutdown.wait(self.retry_delay) {
                return Err(OrganizerError::Interrupted);
            }
        }
    }
}

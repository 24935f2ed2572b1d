//! Settle detection: decide when a new file has finished being written.
//!
//! State machine:
//! - Pending: wait the initial delay once (downloaders often create an empty placeholder first).
//! - Sampling: read the size every poll interval; two equal consecutive samples -> Settled.
//!   A missing file -> Vanished. A read refused by a lock (or any other I/O error) waits the
//!   lock-retry delay and samples again; more than `max_lock_retries` consecutive failures
//!   -> LockedRetryExceeded. A successful sample resets the count.
//! - Every wait observes shutdown -> Interrupted.
//!
//! Once the size is stable the file is also opened for reading; on Windows a writer
//! holding the file without sharing fails that probe, so a paused-but-open download
//! is not mistaken for a finished one.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

use crate::shutdown::Shutdown;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const LOCK_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const MAX_LOCK_RETRIES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Size unchanged across two consecutive samples.
    Settled { size: u64 },
    /// The file disappeared (deleted or moved by someone else).
    Vanished,
    /// Reads kept failing; the file is left alone.
    LockedRetryExceeded { attempts: u32 },
    /// Shutdown was requested while waiting.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct SettleDetector {
    initial_delay: Duration,
    poll_interval: Duration,
    lock_retry_delay: Duration,
    max_lock_retries: u32,
    shutdown: Shutdown,
}

impl SettleDetector {
    pub fn new(initial_delay: Duration, shutdown: Shutdown) -> Self {
        Self {
            initial_delay,
            poll_interval: POLL_INTERVAL,
            lock_retry_delay: LOCK_RETRY_DELAY,
            max_lock_retries: MAX_LOCK_RETRIES,
            shutdown,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_lock_retry(mut self, delay: Duration, max_retries: u32) -> Self {
        self.lock_retry_delay = delay;
        self.max_lock_retries = max_retries;
        self
    }

    /// Block the calling worker until `path` settles, vanishes, stays unreadable, or
    /// shutdown is requested.
    pub fn await_settled(&self, path: &Path) -> SettleOutcome {
        if !self.shutdown.wait(self.initial_delay) {
            return SettleOutcome::Interrupted;
        }

        let mut previous: Option<u64> = None;
        let mut failures: u32 = 0;

        loop {
            let sample = fs::metadata(path).and_then(|meta| {
                let size = meta.len();
                if previous == Some(size) {
                    // Stable size; make sure nobody holds it exclusively.
                    File::open(path)?;
                }
                Ok(size)
            });

            let wait = match sample {
                Ok(size) if previous == Some(size) => {
                    debug!(path = %path.display(), size, "file settled");
                    return SettleOutcome::Settled { size };
                }
                Ok(size) => {
                    trace!(path = %path.display(), size, ?previous, "size sample");
                    previous = Some(size);
                    failures = 0;
                    self.poll_interval
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "file vanished while settling");
                    return SettleOutcome::Vanished;
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.max_lock_retries {
                        return SettleOutcome::LockedRetryExceeded { attempts: failures };
                    }
                    debug!(
                        path = %path.display(),
                        error = %e,
                        attempt = failures,
                        max = self.max_lock_retries,
                        "file not readable yet; will retry"
                    );
                    self.lock_retry_delay
                }
            };

            if !self.shutdown.wait(wait) {
                return SettleOutcome::Interrupted;
            }
        }
    }
}

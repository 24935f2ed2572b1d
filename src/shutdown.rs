//! Cooperative shutdown coordination.
//! A cloneable handle set by the ctrlc handler; long-running waits go through
//! [`Shutdown::wait`] so they wake as soon as a stop is requested.
//!
//! Notes:
//! - `request()` is idempotent and safe to call from the ctrlc handler thread.
//! - Handles are explicit values, so tests can run with independent flags in parallel.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    stopped: Mutex<bool>,
    wake: Condvar,
}

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a cooperative shutdown and wake every waiter.
    pub fn request(&self) {
        let mut stopped = self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stopped = true;
        self.inner.wake.notify_all();
    }

    /// Check whether a shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        *self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait up to `dur`. Returns `true` if the full duration elapsed,
    /// `false` if shutdown was requested before or during the wait.
    pub fn wait(&self, dur: Duration) -> bool {
        let guard = self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *guard {
            return false;
        }
        let (guard, _timeout) = self
            .inner
            .wake
            .wait_timeout_while(guard, dur, |stopped| !*stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        !*guard
    }
}

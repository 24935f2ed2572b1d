//! Event handler / orchestrator.
//!
//! Each creation event is handled on its own worker thread so a slow download never
//! delays files that arrive after it. Within one file the pipeline is sequential:
//! filter -> settle -> resolve destination -> move. Shared state (statistics, the set of
//! files in flight and the set of reserved destination names) is lock-guarded.

use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

use crate::classify::classify;
use crate::config::{Config, is_reserved_name};
use crate::errors::OrganizerError;
use crate::filter::{is_excluded, is_temporary};
use crate::fs_ops::{Mover, SettleDetector, SettleOutcome, destination_dir, pick_name};
use crate::shutdown::Shutdown;
use crate::stats::Stats;
use crate::watch::CreatedEvent;

/// Terminal state of one event's pipeline.
#[derive(Debug)]
pub enum HandleOutcome {
    Moved(PathBuf),
    IgnoredDirectory,
    /// Not a direct child of the root.
    IgnoredOutsideRoot,
    IgnoredTemporary,
    Excluded,
    /// Both date and type nesting are off; the root is already the destination folder.
    AlreadyInPlace,
    /// Another worker already owns this path.
    AlreadyTracked,
    Vanished,
    Locked { attempts: u32 },
    Interrupted,
    Failed(OrganizerError),
}

pub struct Organizer {
    root: PathBuf,
    config: Config,
    stats: Arc<Stats>,
    shutdown: Shutdown,
    detector: SettleDetector,
    mover: Mover,
    in_flight: Mutex<HashSet<PathBuf>>,
    reserved: Mutex<HashSet<PathBuf>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Organizer {
    pub fn new(root: impl Into<PathBuf>, config: Config, shutdown: Shutdown) -> Self {
        let detector = SettleDetector::new(config.delay, shutdown.clone());
        let mover = Mover::from_config(&config, shutdown.clone());
        Self {
            root: root.into(),
            config,
            stats: Arc::new(Stats::new()),
            shutdown,
            detector,
            mover,
            in_flight: Mutex::new(HashSet::new()),
            reserved: Mutex::new(HashSet::new()),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Shorter size-sampling interval (tests).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.detector = self.detector.with_poll_interval(interval);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared counters, for periodic reporting.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Handle `event` on a new worker thread. Returns immediately.
    pub fn dispatch(self: &Arc<Self>, event: CreatedEvent) {
        let this = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("organize-file".into())
            .spawn(move || {
                let outcome = this.handle(event);
                trace!(?outcome, "worker finished");
            });
        match spawned {
            Ok(handle) => {
                let mut workers = lock(&self.workers);
                workers.retain(|h| !h.is_finished());
                workers.push(handle);
            }
            Err(e) => error!(error = %e, "Failed to spawn worker thread"),
        }
    }

    /// Number of workers that have not finished yet.
    pub fn active_workers(&self) -> usize {
        lock(&self.workers).iter().filter(|h| !h.is_finished()).count()
    }

    /// Join every dispatched worker, including ones dispatched while waiting.
    pub fn wait_idle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = lock(&self.workers).drain(..).collect();
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if handle.join().is_err() {
                    error!("A worker thread panicked");
                }
            }
        }
    }

    /// Run the whole pipeline for one event on the calling thread.
    pub fn handle(&self, event: CreatedEvent) -> HandleOutcome {
        let path = event.path;

        if event.is_dir {
            trace!(path = %path.display(), "ignoring directory");
            return HandleOutcome::IgnoredDirectory;
        }
        if path.parent() != Some(self.root.as_path()) {
            trace!(path = %path.display(), "ignoring path outside the watched root");
            return HandleOutcome::IgnoredOutsideRoot;
        }
        if is_temporary(&path) {
            return HandleOutcome::IgnoredTemporary;
        }
        if path.file_name().is_some_and(is_reserved_name) || is_excluded(&path, &self.config) {
            debug!(path = %path.display(), "Skipping excluded file");
            return HandleOutcome::Excluded;
        }
        if !self.config.organize_by_date && !self.config.organize_by_type {
            debug!(path = %path.display(), "No nesting configured; leaving file in place");
            return HandleOutcome::AlreadyInPlace;
        }
        if self.shutdown.is_requested() {
            return HandleOutcome::Interrupted;
        }

        let Some(_tracked) = Claim::acquire(&self.in_flight, &path) else {
            trace!(path = %path.display(), "already being handled");
            return HandleOutcome::AlreadyTracked;
        };

        debug!(path = %path.display(), "Waiting for file to settle");
        match self.detector.await_settled(&path) {
            SettleOutcome::Settled { size } => {
                debug!(path = %path.display(), size, "File settled");
            }
            SettleOutcome::Vanished => {
                info!(path = %path.display(), "File disappeared before it settled; skipping");
                return HandleOutcome::Vanished;
            }
            SettleOutcome::LockedRetryExceeded { attempts } => {
                warn!(path = %path.display(), attempts, "File stayed locked; leaving it in place");
                return HandleOutcome::Locked { attempts };
            }
            SettleOutcome::Interrupted => {
                debug!(path = %path.display(), "Shutdown while settling; abandoning");
                return HandleOutcome::Interrupted;
            }
        }

        let category = classify(&path, &self.config.categories).to_string();

        // Folder creation happens outside the lock; only name selection is serialized.
        let resolved = destination_dir(&path, &self.root, &self.config, Local::now().date_naive())
            .and_then(|dir| {
                let mut reserved = lock(&self.reserved);
                let dest = pick_name(&path, &dir, &self.config, &|p: &Path| reserved.contains(p))?;
                reserved.insert(dest.clone());
                Ok(dest)
            });
        let reservation = match resolved {
            Ok(dest) => Claim::adopt(&self.reserved, dest),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Could not prepare destination; leaving file in place");
                return HandleOutcome::Failed(OrganizerError::Destination {
                    src: path.clone(),
                    source: e,
                });
            }
        };
        let dest = reservation.path.clone();

        match self
            .mover
            .move_with_retry(&path, &dest, &category, &self.stats)
        {
            Ok(dest) => HandleOutcome::Moved(dest),
            Err(OrganizerError::SourceVanished(p)) => {
                info!(path = %p.display(), "File disappeared before it could be moved");
                HandleOutcome::Vanished
            }
            Err(OrganizerError::Interrupted) => HandleOutcome::Interrupted,
            Err(e @ OrganizerError::DestinationExists(_)) => {
                warn!(code = e.code(), src = %path.display(), error = %e, "Duplicate renaming is off; leaving file in place");
                HandleOutcome::Failed(e)
            }
            Err(e) => {
                error!(code = e.code(), src = %path.display(), error = %e, "Move failed; leaving file in place");
                HandleOutcome::Failed(e)
            }
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Membership of `path` in a shared set, released on drop.
struct Claim<'a> {
    set: &'a Mutex<HashSet<PathBuf>>,
    path: PathBuf,
}

impl<'a> Claim<'a> {
    /// Insert `path` if absent; `None` if someone else holds it.
    fn acquire(set: &'a Mutex<HashSet<PathBuf>>, path: &Path) -> Option<Self> {
        if lock(set).insert(path.to_path_buf()) {
            Some(Self {
                set,
                path: path.to_path_buf(),
            })
        } else {
            None
        }
    }

    /// Take ownership of an entry already inserted by the caller.
    fn adopt(set: &'a Mutex<HashSet<PathBuf>>, path: PathBuf) -> Self {
        Self { set, path }
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.path);
    }
}

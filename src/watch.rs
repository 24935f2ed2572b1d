//! Directory watcher adapter.
//!
//! Wraps a non-recursive `notify::RecommendedWatcher` on the root and turns raw events
//! into [`CreatedEvent`]s on a std channel. Only "something appeared" events pass:
//! creations, plus renames whose target lands in the root (browsers finish downloads
//! by renaming `name.crdownload` to `name`).

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create watcher: {0}")]
    Create(#[from] notify::Error),

    #[error("Failed to watch path {path}: {source}")]
    WatchPath {
        path: PathBuf,
        source: notify::Error,
    },
}

/// A new entry appeared directly inside the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl CreatedEvent {
    /// Build from a path, reading the directory flag from the filesystem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_dir = path.symlink_metadata().map(|m| m.is_dir()).unwrap_or(false);
        Self { path, is_dir }
    }
}

/// Translate one notify event into zero or more creation events.
pub fn created_events(event: &Event) -> Vec<CreatedEvent> {
    let appeared: Vec<&PathBuf> = match event.kind {
        EventKind::Create(_) => event.paths.iter().collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.iter().collect(),
        // Paths are [from, to]; only the target is new.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.get(1).into_iter().collect(),
        _ => Vec::new(),
    };
    appeared.into_iter().cloned().map(CreatedEvent::from_path).collect()
}

/// Live watch on one directory. Dropping it stops the OS watch.
pub struct DirWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl DirWatcher {
    /// Start watching `root` non-recursively; events arrive on the returned receiver.
    pub fn start(root: &Path) -> Result<(Self, Receiver<CreatedEvent>), WatchError> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(forwarder(tx), notify::Config::default())?;
        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::WatchPath {
                path: root.to_path_buf(),
                source,
            })?;
        Ok((
            Self {
                _watcher: watcher,
                root: root.to_path_buf(),
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn forwarder(tx: Sender<CreatedEvent>) -> impl FnMut(notify::Result<Event>) + Send + 'static {
    move |res: notify::Result<Event>| match res {
        Ok(event) => {
            trace!(kind = ?event.kind, paths = ?event.paths, "raw watch event");
            for created in created_events(&event) {
                // Receiver gone means we are shutting down.
                let _ = tx.send(created);
            }
        }
        Err(e) => warn!(error = %e, "watch error"),
    }
}

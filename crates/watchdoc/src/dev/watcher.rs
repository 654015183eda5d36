//! File system watcher for the served and source trees.
//!
//! Watches are registered one directory at a time (the OS primitive is
//! non-recursive) so that version-control and dependency directories are
//! never descended into. Changes and watcher failures are surfaced on a
//! single tagged stream.

use crate::dev::paths::is_skipped_directory;
use crate::error::{CliError, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File contents were written
    Write,
    /// A file or directory appeared (including rename destinations)
    Create,
    /// Anything else (removal, metadata, access)
    Other,
}

impl ChangeKind {
    fn from_notify(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Other,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Create,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Other,
            EventKind::Modify(_) => ChangeKind::Write,
            _ => ChangeKind::Other,
        }
    }
}

/// A single change notification for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path of the changed entry
    pub path: PathBuf,
    /// Operation kind
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Only writes and creations can trigger a dispatch.
    pub fn is_write_or_create(&self) -> bool {
        matches!(self.kind, ChangeKind::Write | ChangeKind::Create)
    }

    fn from_notify(event: Event) -> Vec<Self> {
        let kind = ChangeKind::from_notify(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| Self { path, kind })
            .collect()
    }
}

/// Item on the watch stream.
#[derive(Debug)]
pub enum WatchMessage {
    /// A path changed
    Change(ChangeEvent),
    /// The underlying watcher reported a failure
    Error(notify::Error),
}

/// Receiving half of the watch stream.
///
/// Unbounded; closes when the owning [`FileWatcher`] is dropped.
pub type WatchStream = mpsc::UnboundedReceiver<WatchMessage>;

/// Directory-by-directory watcher.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    watched: usize,
}

impl FileWatcher {
    /// Create a watcher and register every directory under `targets`.
    ///
    /// Registration failures for individual directories are logged and
    /// skipped. Only failing to create the OS watcher itself is an error.
    pub fn new(targets: &[PathBuf]) -> Result<(Self, WatchStream)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in ChangeEvent::from_notify(event) {
                    let _ = tx.send(WatchMessage::Change(change));
                }
            }
            Err(e) => {
                let _ = tx.send(WatchMessage::Error(e));
            }
        })
        .map_err(CliError::Watch)?;

        let mut file_watcher = Self {
            watcher,
            watched: 0,
        };

        for target in targets {
            let count = file_watcher.watch_tree(target);
            tracing::info!(
                "Watching for changes in: {} ({} directories)",
                target.display(),
                count
            );
        }

        Ok((file_watcher, rx))
    }

    /// Register watches on `root` and every non-skipped directory below it.
    ///
    /// Returns the number of directories registered.
    pub fn watch_tree(&mut self, root: &Path) -> usize {
        let mut registered = 0;

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && is_skipped_directory(entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error walking {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            match self.watcher.watch(entry.path(), RecursiveMode::NonRecursive) {
                Ok(()) => registered += 1,
                Err(e) => {
                    tracing::warn!("Couldn't watch {}: {}", entry.path().display(), e);
                }
            }
        }

        self.watched += registered;
        registered
    }

    /// Total number of directories currently registered.
    pub fn watched(&self) -> usize {
        self.watched
    }
}

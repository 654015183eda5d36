//! Resolution of watch targets and source roots from configuration.

use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Directories to watch, plus the subset that counts as source.
///
/// Computed once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTargets {
    served_root: PathBuf,
    extras: Vec<PathBuf>,
}

impl WatchTargets {
    /// The served output root.
    pub fn served_root(&self) -> &Path {
        &self.served_root
    }

    /// Extra directories whose changes trigger the rebuild command.
    ///
    /// Never contains the served root.
    pub fn sources(&self) -> &[PathBuf] {
        &self.extras
    }

    /// Every directory tree to watch. The served root is always first.
    pub fn targets(&self) -> Vec<PathBuf> {
        std::iter::once(self.served_root.clone())
            .chain(self.extras.iter().cloned())
            .collect()
    }
}

/// Build the watch target set from a comma-separated list of extra directories.
///
/// Entries are trimmed and empty entries dropped. Each remaining entry is made
/// absolute; an entry that cannot be resolved is logged and skipped.
pub fn resolve(extra_dirs_csv: &str, served_root: &Path) -> WatchTargets {
    let mut extras = Vec::new();

    for entry in extra_dirs_csv.split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }

        match std::path::absolute(entry) {
            Ok(abs) => {
                extras.push(abs.clean());
            }
            Err(e) => {
                tracing::warn!("Skipping invalid watch dir {}: {}", entry, e);
            }
        }
    }

    WatchTargets {
        served_root: served_root.to_path_buf(),
        extras,
    }
}

//! Path predicates used by the watch pipeline.
//!
//! All functions here are pure. Containment checks work on absolute,
//! already-resolved paths; callers resolve symlinks and `..` segments first.

use std::path::{Component, Path, PathBuf};

/// Directory names that are never descended into or watched.
///
/// Version-control metadata, dependency caches and vendored code.
pub const SKIPPED_DIRECTORIES: &[&str] = &[".git", ".hg", ".svn", "node_modules", "vendor"];

/// Returns true for editor and swap-file churn.
///
/// A path is noise when its last segment is hidden (starts with `.`), or
/// when the full path ends with `~` or `.swp`.
pub fn is_noise(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);

    if hidden {
        return true;
    }

    let full = path.to_string_lossy();
    full.ends_with('~') || full.ends_with(".swp")
}

/// Returns true if any segment of `path` is a reserved directory name.
pub fn is_skipped_directory(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name)),
        _ => false,
    })
}

/// Plain prefix containment: is `path` under `root`?
///
/// This is a byte-prefix test, not a component test, so `/srv/site2` counts
/// as under `/srv/site`.
pub fn is_under(path: &Path, root: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .starts_with(root.as_os_str().as_encoded_bytes())
}

/// Is `path` under any of `roots`?
pub fn is_under_any(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| is_under(path, root))
}

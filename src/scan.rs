//! Recursive workspace scan producing a [`FileNode`] forest.

use std::path::Path;

use tracing::warn;

use crate::model::{FileNode, NodeKind};
use crate::ports::FileSystem;

/// Directory names skipped in addition to hidden entries.
pub const DEFAULT_EXCLUDED: &[&str] = &["node_modules", "dist"];

/// Filtering rules applied while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Entry names skipped wherever they appear.
    pub excluded: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { excluded: DEFAULT_EXCLUDED.iter().map(ToString::to_string).collect() }
    }
}

impl ScanOptions {
    /// Default exclusions plus `extra`, without duplicates.
    #[must_use]
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        for name in extra {
            let name = name.into();
            if !name.is_empty() && !options.excluded.contains(&name) {
                options.excluded.push(name);
            }
        }
        options
    }

    /// Returns `true` if an entry with this name must not appear in the scan.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded.iter().any(|excluded| excluded == name)
    }
}

/// Scans `root` and returns its visible entries.
///
/// Never fails: unreadable directories (the root included) contribute no
/// entries and are logged as warnings.
#[must_use]
pub fn scan(fs: &dyn FileSystem, root: &Path, options: &ScanOptions) -> Vec<FileNode> {
    scan_directory(fs, root, "", options)
}

/// Scans one directory; `relative` is its path from the scan root using `/`
/// separators (empty for the root itself).
#[must_use]
pub fn scan_directory(
    fs: &dyn FileSystem,
    dir: &Path,
    relative: &str,
    options: &ScanOptions,
) -> Vec<FileNode> {
    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        if options.is_excluded(&entry.name) {
            continue;
        }

        let path = dir.join(entry.file_name());
        let relative_path =
            if relative.is_empty() { entry.name.clone() } else { format!("{relative}/{}", entry.name) };

        let children = match entry.kind {
            NodeKind::Directory => scan_directory(fs, &path, &relative_path, options),
            NodeKind::File => Vec::new(),
        };

        items.push(FileNode {
            id: node_id(&relative_path),
            name: entry.name,
            path,
            kind: entry.kind,
            children,
        });
    }
    items
}

/// Derives a node id from a root-relative path.
#[must_use]
pub fn node_id(relative_path: &str) -> String {
    relative_path.replace(['/', '\\'], "-")
}

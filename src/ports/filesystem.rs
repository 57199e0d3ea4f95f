//! Filesystem port for directory listings and file reads.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BoxError;
use crate::model::NodeKind;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Base name of the entry, lossily decoded for display.
    pub name: String,
    /// File or directory, judged without following symlinks.
    pub kind: NodeKind,
    /// The on-disk name when it is not valid UTF-8 and `name` is only an
    /// approximation of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<OsString>,
}

impl DirEntry {
    /// Creates an entry whose name is exactly `name`.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self { name: name.into(), kind, raw_name: None }
    }

    /// Creates an entry from a host file name, keeping the raw name when it
    /// does not decode as UTF-8.
    #[must_use]
    pub fn from_os(file_name: OsString, kind: NodeKind) -> Self {
        match file_name.into_string() {
            Ok(name) => Self::new(name, kind),
            Err(raw) => {
                Self { name: raw.to_string_lossy().into_owned(), kind, raw_name: Some(raw) }
            }
        }
    }

    /// The name to join onto the parent path to reach this entry.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        self.raw_name.as_deref().unwrap_or_else(|| OsStr::new(&self.name))
    }
}

/// Read-only filesystem access.
///
/// Abstracting the filesystem allows deterministic replay and testing
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Lists the entries of a directory in the order the host returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, BoxError>;

    /// Reads the full byte content of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, BoxError>;
}

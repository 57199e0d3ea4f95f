//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::model::NodeKind;
use crate::ports::{BoxError, DirEntry, FileSystem};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, BoxError> {
        let mut entries = Vec::new();
        // Host order is kept; the UI renders entries as listed.
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let kind =
                if entry.file_type()?.is_dir() { NodeKind::Directory } else { NodeKind::File };
            entries.push(DirEntry::from_os(entry.file_name(), kind));
        }
        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BoxError> {
        Ok(std::fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let mut entries = LiveFileSystem.read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![
                DirEntry::new("a.txt", NodeKind::File),
                DirEntry::new("sub", NodeKind::Directory),
            ]
        );
        assert_eq!(LiveFileSystem.read(&dir.path().join("a.txt")).unwrap(), b"hello");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LiveFileSystem.read_dir(&dir.path().join("gone")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_a_leaf() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let entries = LiveFileSystem.read_dir(dir.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, NodeKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_directory_is_scanned_at_its_real_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        use crate::scan::{scan, ScanOptions};

        let dir = tempfile::tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9");
        std::fs::create_dir(dir.path().join(raw)).unwrap();
        std::fs::write(dir.path().join(raw).join("inner.rs"), "fn f() {}").unwrap();

        let entries = LiveFileSystem.read_dir(dir.path()).unwrap();
        assert_eq!(entries[0].name, "caf\u{fffd}");
        assert_eq!(entries[0].file_name(), raw);

        let forest = scan(&LiveFileSystem, dir.path(), &ScanOptions::default());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].path, dir.path().join(raw));
        assert!(forest[0].path.is_dir());
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].id, "caf\u{fffd}-inner.rs");
        assert!(forest[0].children[0].path.is_file());
    }
}

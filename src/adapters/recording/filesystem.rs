//! Recording adapter for the `FileSystem` port.

use std::path::Path;

use super::{record_result, PathInput, SharedRecorder};
use crate::cassette::format::FileContent;
use crate::ports::{BoxError, DirEntry, FileSystem};

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: SharedRecorder,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl FileSystem for RecordingFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, BoxError> {
        let result = self.inner.read_dir(path);
        record_result(&self.recorder, "fs", "read_dir", &PathInput::new(path), &result);
        result
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BoxError> {
        let result = self.inner.read(path);
        let content = result.as_ref().map(|bytes| FileContent::from_bytes(bytes));
        record_result(&self.recorder, "fs", "read", &PathInput::new(path), &content);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;

    #[test]
    fn records_reads_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hello").unwrap();
        let cassette_path = dir.path().join("fs.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "fs")));

        let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
        assert_eq!(fs.read(&dir.path().join("hello.txt")).unwrap(), b"hello");
        assert!(fs.read_dir(&dir.path().join("missing")).is_err());

        recorder.lock().unwrap().save().unwrap();
        let cassette = Cassette::load(&cassette_path).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].method, "read");
        assert_eq!(cassette.interactions[0].output, json!({"ok": "hello"}));
        assert!(cassette.interactions[1].output.get("err").is_some());
    }

    #[test]
    fn invalid_utf8_is_recorded_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blob.bin"), [0xff, 0xfe]).unwrap();
        let cassette_path = dir.path().join("blob.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "blob")));

        let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
        assert_eq!(fs.read(&dir.path().join("blob.bin")).unwrap(), [0xff, 0xfe]);

        recorder.lock().unwrap().save().unwrap();
        let cassette = Cassette::load(&cassette_path).unwrap();
        assert_eq!(cassette.interactions[0].output, json!({"ok": [255, 254]}));
    }
}

//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::format::FileContent;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{BoxError, DirEntry, FileSystem};

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_dir(&self, _path: &Path) -> Result<Vec<DirEntry>, BoxError> {
        let output = next_output(&self.replayer, "fs", "read_dir");
        replay_result(&output, "fs::read_dir")
    }

    fn read(&self, _path: &Path) -> Result<Vec<u8>, BoxError> {
        let output = next_output(&self.replayer, "fs", "read");
        replay_result::<FileContent>(&output, "fs::read").map(FileContent::into_bytes)
    }
}

//! Service context bundling the port trait objects used by the core.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::GeminiClient;
use crate::adapters::live::secrets::FileSecretStore;
use crate::adapters::recording::{
    RecordingFileSystem, RecordingLlmClient, RecordingSecretStore, SharedRecorder,
};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingLlmClient, ReplayingSecretStore};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Settings;
use crate::ports::{FileSystem, LlmClient, SecretStore};

/// Bundles the port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). The context is shared read-only between the panel's tasks.
pub struct ServiceContext {
    /// Filesystem for scans and file reads.
    pub fs: Box<dyn FileSystem>,
    /// Language model used for summaries.
    pub llm: Box<dyn LlmClient>,
    /// Credential storage.
    pub secrets: Box<dyn SecretStore>,
    /// Cassette recorder; saved to disk on drop.
    recorder: Option<SharedRecorder>,
}

impl ServiceContext {
    /// Assembles a context from explicit adapters.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        llm: Box<dyn LlmClient>,
        secrets: Box<dyn SecretStore>,
    ) -> Self {
        Self { fs, llm, secrets, recorder: None }
    }

    /// Creates a live context talking to the real disk, the configured API
    /// base and the configured secret store.
    ///
    /// # Errors
    ///
    /// Returns an error if no secret store location can be determined.
    pub fn live(settings: &Settings) -> Result<Self, String> {
        Ok(Self::new(
            Box::new(LiveFileSystem),
            Box::new(GeminiClient::new(settings.api_base.clone())),
            Box::new(secret_store(settings)?),
        ))
    }

    /// Creates a live context that records every port call to a cassette at
    /// `path`. The cassette is written when the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if no secret store location can be determined.
    pub fn recording(path: &Path, settings: &Settings) -> Result<Self, String> {
        let recorder: SharedRecorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "structgraph-session")));

        Ok(Self {
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder))),
            llm: Box::new(RecordingLlmClient::new(
                Box::new(GeminiClient::new(settings.api_base.clone())),
                Arc::clone(&recorder),
            )),
            secrets: Box::new(RecordingSecretStore::new(
                Box::new(secret_store(settings)?),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        })
    }

    /// Creates a context served entirely from a cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so cursors
    /// advance independently.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an already loaded cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::new(
            Box::new(ReplayingFileSystem::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingLlmClient::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingSecretStore::new(CassetteReplayer::new(cassette))),
        )
    }
}

fn secret_store(settings: &Settings) -> Result<FileSecretStore, String> {
    match &settings.secrets_file {
        Some(path) => Ok(FileSecretStore::new(path)),
        None => FileSecretStore::at_default_location().map_err(|e| e.to_string()),
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
        match recorder.save() {
            Ok(path) => info!(path = %path.display(), interactions = recorder.len(), "cassette saved"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ports::API_KEY_SECRET;

    fn settings_in(dir: &Path) -> Settings {
        Settings { secrets_file: Some(dir.join("secrets.json")), ..Settings::default() }
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let cassette_path = dir.path().join("out/run.cassette.yaml");

        {
            let ctx = ServiceContext::recording(&cassette_path, &settings_in(dir.path())).unwrap();
            assert_eq!(ctx.fs.read(&dir.path().join("a.txt")).unwrap(), b"hello");
            assert_eq!(ctx.secrets.get(API_KEY_SECRET).unwrap(), None);
        }

        let cassette = Cassette::load(&cassette_path).unwrap();
        let calls: Vec<_> =
            cassette.interactions.iter().map(|i| format!("{}::{}", i.port, i.method)).collect();
        assert_eq!(calls, ["fs::read", "secrets::get"]);
    }

    #[test]
    fn replaying_context_serves_recorded_calls() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();
        let cassette_path = dir.path().join("run.cassette.yaml");

        {
            let ctx = ServiceContext::recording(&cassette_path, &settings_in(dir.path())).unwrap();
            ctx.fs.read(&file).unwrap();
        }
        std::fs::remove_file(&file).unwrap();

        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        assert_eq!(ctx.fs.read(&file).unwrap(), b"hello");
    }

    #[test]
    fn replaying_missing_cassette_is_an_error() {
        let err = ServiceContext::replaying(&PathBuf::from("/nope/missing.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("missing.yaml"));
    }
}

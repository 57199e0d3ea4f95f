//! Recording adapters that capture port traffic into a cassette.

pub mod filesystem;
pub mod llm;
pub mod secrets;

pub use filesystem::RecordingFileSystem;
pub use llm::RecordingLlmClient;
pub use secrets::RecordingSecretStore;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Shared handle to the recorder all adapters of one session write into.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Record a `Result<T, E>` interaction.
///
/// `Ok(v)` is stored as `{"ok": v}` and `Err(e)` as `{"err": e.to_string()}`,
/// the shape the replaying adapters read back.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output_json = match result {
        Ok(v) => {
            serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or(serde_json::Value::Null) })
        }
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };

    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(
        port,
        method,
        input_json,
        output_json,
    );
}

/// Input shape shared by path-taking methods.
#[derive(Serialize)]
pub(crate) struct PathInput {
    pub(crate) path: String,
}

impl PathInput {
    pub(crate) fn new(path: &std::path::Path) -> Self {
        Self { path: path.display().to_string() }
    }
}

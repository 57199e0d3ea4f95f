//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod llm;
pub mod secrets;

pub use filesystem::ReplayingFileSystem;
pub use llm::ReplayingLlmClient;
pub use secrets::ReplayingSecretStore;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::BoxError;

/// Pop the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    replayer.next_interaction(port, method).output.clone()
}

/// Decode a recorded `{"ok": v}` / `{"err": msg}` output.
///
/// An output with neither key is treated as a bare `ok` value.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, BoxError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize recorded output: {e}").into())
}

//! Replaying adapter for the `SecretStore` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{BoxError, SecretStore};

/// Replays recorded secret-store calls.
pub struct ReplayingSecretStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingSecretStore {
    /// Creates a replaying store from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl SecretStore for ReplayingSecretStore {
    fn get(&self, _key: &str) -> Result<Option<String>, BoxError> {
        let output = next_output(&self.replayer, "secrets", "get");
        replay_result(&output, "secrets::get")
    }

    fn store(&self, _key: &str, _value: &str) -> Result<(), BoxError> {
        let output = next_output(&self.replayer, "secrets", "store");
        replay_result(&output, "secrets::store")
    }

    fn delete(&self, _key: &str) -> Result<(), BoxError> {
        let output = next_output(&self.replayer, "secrets", "delete");
        replay_result(&output, "secrets::delete")
    }
}

//! Recording adapter for the `SecretStore` port.

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::ports::{BoxError, SecretStore};

/// Placeholder written instead of real secret values.
pub const REDACTED: &str = "<redacted>";

/// Records secret-store calls with every value redacted.
pub struct RecordingSecretStore {
    inner: Box<dyn SecretStore>,
    recorder: SharedRecorder,
}

impl RecordingSecretStore {
    /// Creates a recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn SecretStore>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct KeyInput<'a> {
    key: &'a str,
}

impl SecretStore for RecordingSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let result = self.inner.get(key);
        let redacted = result.as_ref().map(|value| value.as_ref().map(|_| REDACTED));
        record_result(&self.recorder, "secrets", "get", &KeyInput { key }, &redacted);
        result
    }

    fn store(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let result = self.inner.store(key, value);
        record_result(&self.recorder, "secrets", "store", &KeyInput { key }, &result);
        result
    }

    fn delete(&self, key: &str) -> Result<(), BoxError> {
        let result = self.inner.delete(key);
        record_result(&self.recorder, "secrets", "delete", &KeyInput { key }, &result);
        result
    }
}

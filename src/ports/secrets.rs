//! Secret storage port for the API credential.

use std::fmt;

use super::BoxError;

/// Key under which the Gemini API key is stored.
pub const API_KEY_SECRET: &str = "gemini-api-key";

/// An API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret for use in an outbound request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Persistent key/value storage for secrets.
pub trait SecretStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BoxError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn store(&self, key: &str, value: &str) -> Result<(), BoxError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn delete(&self, key: &str) -> Result<(), BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_secret() {
        let credential = Credential::new("super-secret");
        let printed = format!("{credential:?}");
        assert!(!printed.contains("super-secret"));
        assert_eq!(credential.expose(), "super-secret");
    }
}

//! File-backed secret store.
//!
//! Secrets live in a JSON object in `secrets.json` under the platform config
//! directory. On Unix the file is created with mode `0600`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ports::{BoxError, SecretStore};

/// Failures of the file-backed store.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// The platform has no config directory we can use.
    #[error("could not determine a configuration directory for the secret store")]
    NoConfigDir,
    /// Reading or writing the secrets file failed.
    #[error("secret store {path}: {source}")]
    Io {
        /// Secrets file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The secrets file is not a JSON object of strings.
    #[error("secret store {path} is corrupt: {source}")]
    Corrupt {
        /// Secrets file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Secret store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError::NoConfigDir`] when no home directory is known.
    pub fn at_default_location() -> Result<Self, SecretStoreError> {
        let dirs = directories::ProjectDirs::from("", "", "structgraph")
            .ok_or(SecretStoreError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("secrets.json")))
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SecretStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(SecretStoreError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&content)
            .map_err(|source| SecretStoreError::Corrupt { path: self.path.clone(), source })
    }

    fn save(&self, secrets: &BTreeMap<String, String>) -> Result<(), SecretStoreError> {
        let io_err = |source| SecretStoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(secrets)
            .map_err(|source| SecretStoreError::Corrupt { path: self.path.clone(), source })?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        restrict_permissions(&self.path).map_err(io_err)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok(self.load()?.remove(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let mut secrets = self.load()?;
        secrets.insert(key.to_string(), value.to_string());
        Ok(self.save(&secrets)?)
    }

    fn delete(&self, key: &str) -> Result<(), BoxError> {
        let mut secrets = self.load()?;
        if secrets.remove(key).is_some() {
            self.save(&secrets)?;
        }
        Ok(())
    }
}

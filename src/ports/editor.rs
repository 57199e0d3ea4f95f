//! Editor port: the host window the panel lives in.

use std::path::{Path, PathBuf};

use super::BoxError;

/// Facilities the hosting editor provides to the panel controller.
pub trait Editor: Send + Sync {
    /// Workspace roots in host order. Only the first one is scanned.
    fn workspace_roots(&self) -> Vec<PathBuf>;

    /// Opens `path` as a document and shows it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be opened.
    fn open_document(&self, path: &Path) -> Result<(), BoxError>;

    /// Shows a one-shot error notification.
    fn show_error(&self, message: &str);

    /// Shows a one-shot informational notification.
    fn show_info(&self, message: &str);

    /// Updates the progress indicator titled `title` to `percent`.
    fn report_progress(&self, title: &str, percent: u8);
}

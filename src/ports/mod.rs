//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and
//! something the host provides (file system, language model, secret storage,
//! editor window, UI panel). Implementations live in `src/adapters/`.

pub mod editor;
pub mod filesystem;
pub mod llm;
pub mod secrets;
pub mod webview;

pub use editor::Editor;
pub use filesystem::{DirEntry, FileSystem};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};
pub use secrets::{Credential, SecretStore, API_KEY_SECRET};
pub use webview::Webview;

/// Error type returned across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

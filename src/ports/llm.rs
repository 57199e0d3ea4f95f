//! LLM client port for text generation.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::{BoxError, Credential};

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type LlmFuture<'a> = Pin<Box<dyn Future<Output = Result<CompletionResponse, BoxError>> + Send + 'a>>;

/// A request to generate text from a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g. `"gemini-2.0-flash-exp"`).
    pub model: String,
    /// The full prompt text.
    pub prompt: String,
}

/// The response from a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text, verbatim.
    pub text: String,
    /// Number of prompt tokens consumed, when reported.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Number of completion tokens generated, when reported.
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Sends generation requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates text for the given request, authenticating with `credential`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, quota, etc.).
    fn complete(&self, credential: &Credential, request: &CompletionRequest) -> LlmFuture<'_>;
}

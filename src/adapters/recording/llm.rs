//! Recording adapter for the `LlmClient` port.

use std::sync::Arc;

use super::{record_result, SharedRecorder};
use crate::ports::{CompletionRequest, Credential, LlmClient, LlmFuture};

/// Records LLM interactions while delegating to an inner implementation.
///
/// Only the request is recorded; the credential never reaches the cassette.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: SharedRecorder,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, credential: &Credential, request: &CompletionRequest) -> LlmFuture<'_> {
        let request = request.clone();
        let credential = credential.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.complete(&credential, &request).await;
            record_result(&recorder, "llm", "complete", &request, &result);
            result
        })
    }
}

//! Replaying adapter for the `LlmClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CompletionRequest, CompletionResponse, Credential, LlmClient, LlmFuture};

/// Serves recorded completions from a cassette.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _credential: &Credential, _request: &CompletionRequest) -> LlmFuture<'_> {
        let output = next_output(&self.replayer, "llm", "complete");
        Box::pin(async move { replay_result::<CompletionResponse>(&output, "llm::complete") })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    #[tokio::test]
    async fn replays_completion_text() {
        let cassette = Cassette {
            name: "llm".into(),
            recorded_at: Utc::now(),
            tool_version: "test".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "llm".into(),
                method: "complete".into(),
                input: json!({}),
                output: json!({"ok": {"text": "SUMMARY_TEXT"}}),
            }],
        };
        let llm = ReplayingLlmClient::new(CassetteReplayer::new(&cassette));
        let request = CompletionRequest { model: "m".into(), prompt: "p".into() };

        let response = llm.complete(&Credential::new("k"), &request).await.unwrap();
        assert_eq!(response.text, "SUMMARY_TEXT");
        assert_eq!(response.prompt_tokens, 0);
    }
}

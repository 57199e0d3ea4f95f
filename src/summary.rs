//! Summary requester: file content in, model-written summary out.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::ServiceContext;
use crate::ports::{CompletionRequest, Credential, API_KEY_SECRET};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Instruction placed in front of the file content.
pub const PROMPT_PREAMBLE: &str = "Please provide a concise summary of this file including its \
purpose, main functionality, and key components. Keep it under 200 words:";

/// Title of the progress indicator shown while a summary is generated.
pub const PROGRESS_TITLE: &str = "Generating summary";

/// Milestones reported while a summary is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryProgress {
    /// The request was accepted and a credential is available.
    Started,
    /// The file has been read and decoded.
    ContentRead,
    /// The prompt has been handed to the model.
    RequestSent,
    /// The model answered.
    ResponseReceived,
}

impl SummaryProgress {
    /// Completion percentage shown for this milestone.
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Self::Started => 0,
            Self::ContentRead => 30,
            Self::RequestSent => 60,
            Self::ResponseReceived => 100,
        }
    }
}

/// Knobs for a summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Model identifier.
    pub model: String,
    /// Truncate embedded content to this many bytes; `None` embeds it whole.
    pub max_prompt_bytes: Option<usize>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), max_prompt_bytes: None }
    }
}

/// Ways a summary request can fail.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// No API key has been stored.
    #[error("Gemini API Key not set. Use \"set-credential\" command first.")]
    CredentialMissing,
    /// The secret store could not be read.
    #[error("could not read stored credential: {0}")]
    CredentialStore(String),
    /// The file could not be read.
    #[error("could not read {}: {message}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
    /// The file is not UTF-8 text.
    #[error("{} is not valid UTF-8 text", .path.display())]
    Decode {
        /// File that was requested.
        path: PathBuf,
    },
    /// The generation API failed.
    #[error("{0}")]
    Remote(String),
}

impl SummaryError {
    /// Text shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::CredentialMissing => self.to_string(),
            other => format!("Failed to generate summary: {other}"),
        }
    }
}

/// Embeds `content` in the fixed summary prompt.
#[must_use]
pub fn build_prompt(content: &str) -> String {
    format!("{PROMPT_PREAMBLE}\n\n{content}")
}

/// Summarizes the file at `path`.
///
/// The credential is looked up first; without one nothing is read and no
/// request is made. `progress` observes each milestone in order.
///
/// # Errors
///
/// Returns a [`SummaryError`] describing the first step that failed.
pub async fn summarize(
    ctx: &ServiceContext,
    path: &Path,
    options: &SummaryOptions,
    mut progress: impl FnMut(SummaryProgress) + Send,
) -> Result<String, SummaryError> {
    let credential = ctx
        .secrets
        .get(API_KEY_SECRET)
        .map_err(|e| SummaryError::CredentialStore(e.to_string()))?
        .map(Credential::new)
        .ok_or(SummaryError::CredentialMissing)?;
    progress(SummaryProgress::Started);

    let bytes = ctx
        .fs
        .read(path)
        .map_err(|e| SummaryError::Read { path: path.to_path_buf(), message: e.to_string() })?;
    let content =
        String::from_utf8(bytes).map_err(|_| SummaryError::Decode { path: path.to_path_buf() })?;
    let content = truncate(&content, options.max_prompt_bytes, path);
    progress(SummaryProgress::ContentRead);

    let request = CompletionRequest { model: options.model.clone(), prompt: build_prompt(content) };
    debug!(path = %path.display(), model = %request.model, prompt_bytes = request.prompt.len(), "sending summary request");
    progress(SummaryProgress::RequestSent);

    let response = ctx
        .llm
        .complete(&credential, &request)
        .await
        .map_err(|e| SummaryError::Remote(e.to_string()))?;
    progress(SummaryProgress::ResponseReceived);

    info!(
        path = %path.display(),
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "summary received"
    );
    Ok(response.text)
}

fn truncate<'a>(content: &'a str, limit: Option<usize>, path: &Path) -> &'a str {
    let Some(limit) = limit else {
        return content;
    };
    if content.len() <= limit {
        return content;
    }
    let mut end = limit;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    warn!(path = %path.display(), original_bytes = content.len(), kept_bytes = end, "truncating file content for summary prompt");
    &content[..end]
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::adapters::live::secrets::FileSecretStore;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::{CompletionResponse, LlmClient, LlmFuture, SecretStore};

    /// Answers every request with a fixed text and remembers the prompts.
    struct FixedLlm {
        answer: String,
        prompts: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmClient for FixedLlm {
        fn complete(&self, credential: &Credential, request: &CompletionRequest) -> LlmFuture<'_> {
            assert_eq!(credential.expose(), "test-key");
            self.prompts.lock().unwrap().push(request.clone());
            let text = self.answer.clone();
            Box::pin(async move {
                Ok(CompletionResponse { text, prompt_tokens: 0, completion_tokens: 0 })
            })
        }
    }

    fn live_context(dir: &Path, answer: &str) -> (ServiceContext, Arc<Mutex<Vec<CompletionRequest>>>) {
        let secrets = FileSecretStore::new(dir.join("secrets.json"));
        secrets.store(API_KEY_SECRET, "test-key").unwrap();
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let llm = FixedLlm { answer: answer.into(), prompts: Arc::clone(&prompts) };
        (ServiceContext::new(Box::new(LiveFileSystem), Box::new(llm), Box::new(secrets)), prompts)
    }

    #[tokio::test]
    async fn missing_credential_reads_nothing_and_calls_nothing() {
        // Only a secrets lookup is recorded: any fs or llm call would panic.
        let cassette = Cassette {
            name: "no-credential".into(),
            recorded_at: Utc::now(),
            tool_version: "test".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "secrets".into(),
                method: "get".into(),
                input: json!({"key": API_KEY_SECRET}),
                output: json!({"ok": null}),
            }],
        };
        let ctx = ServiceContext::from_cassette(&cassette);
        let mut events = Vec::new();

        let err = summarize(&ctx, Path::new("/w/readme.md"), &SummaryOptions::default(), |p| {
            events.push(p);
        })
        .await
        .unwrap_err();

        assert!(matches!(err, SummaryError::CredentialMissing));
        assert_eq!(err.user_message(), "Gemini API Key not set. Use \"set-credential\" command first.");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn embeds_content_and_returns_model_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("readme.md");
        std::fs::write(&file, "hello").unwrap();
        let (ctx, prompts) = live_context(dir.path(), "SUMMARY_TEXT");
        let mut events = Vec::new();

        let summary = summarize(&ctx, &file, &SummaryOptions::default(), |p| events.push(p))
            .await
            .unwrap();

        assert_eq!(summary, "SUMMARY_TEXT");
        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].model, DEFAULT_MODEL);
        assert_eq!(prompts[0].prompt, format!("{PROMPT_PREAMBLE}\n\nhello"));
        assert_eq!(
            events,
            [
                SummaryProgress::Started,
                SummaryProgress::ContentRead,
                SummaryProgress::RequestSent,
                SummaryProgress::ResponseReceived,
            ]
        );
        let percents: Vec<u8> = events.iter().map(|p| p.percent()).collect();
        assert_eq!(percents, [0, 30, 60, 100]);
    }

    #[tokio::test]
    async fn every_request_reaches_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.rs");
        std::fs::write(&file, "fn main() {}").unwrap();
        let (ctx, prompts) = live_context(dir.path(), "S");

        for _ in 0..2 {
            summarize(&ctx, &file, &SummaryOptions::default(), |_| {}).await.unwrap();
        }
        assert_eq!(prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blob.bin");
        std::fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();
        let (ctx, prompts) = live_context(dir.path(), "S");

        let err = summarize(&ctx, &file, &SummaryOptions::default(), |_| {}).await.unwrap_err();

        assert!(matches!(err, SummaryError::Decode { .. }));
        assert!(err.user_message().starts_with("Failed to generate summary: "));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _) = live_context(dir.path(), "S");

        let err = summarize(&ctx, &dir.path().join("gone.txt"), &SummaryOptions::default(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::Read { .. }));
    }

    #[tokio::test]
    async fn prompt_cap_truncates_on_a_char_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");
        std::fs::write(&file, "abcé").unwrap();
        let (ctx, prompts) = live_context(dir.path(), "S");
        let options = SummaryOptions { max_prompt_bytes: Some(4), ..SummaryOptions::default() };

        summarize(&ctx, &file, &options, |_| {}).await.unwrap();

        assert_eq!(prompts.lock().unwrap()[0].prompt, build_prompt("abc"));
    }

    #[test]
    fn remote_errors_are_prefixed_for_the_user() {
        let err = SummaryError::Remote("Gemini API error (429): quota".into());
        assert_eq!(err.user_message(), "Failed to generate summary: Gemini API error (429): quota");
    }
}

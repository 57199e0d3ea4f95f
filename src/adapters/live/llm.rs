//! Live adapter for the `LlmClient` port using the Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::{BoxError, CompletionRequest, CompletionResponse, Credential, LlmClient, LlmFuture};

/// Default base URL of the Generative Language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Live LLM client that calls the Gemini API.
pub struct GeminiClient {
    client: Client,
    api_base: String,
}

impl GeminiClient {
    /// Creates a client talking to `api_base` (see [`DEFAULT_API_BASE`]).
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self { client: Client::new(), api_base: api_base.into() }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base.trim_end_matches('/'))
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// Request body for `generateContent`.
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Top-level `generateContent` response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Error body returned by Google APIs.
#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Turns an HTTP status and body into a completion or an error message.
fn parse_response(status: u16, body: &str) -> Result<CompletionResponse, BoxError> {
    if !(200..300).contains(&status) {
        let msg = serde_json::from_str::<GeminiError>(body)
            .map_or_else(|_| body.to_string(), |e| e.error.message);
        return Err(format!("Gemini API error ({status}): {msg}").into());
    }

    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse Gemini API response: {e}"))?;

    let Some(content) = response.candidates.into_iter().next().and_then(|c| c.content) else {
        return Err("Gemini API returned no candidates".into());
    };
    let text = content.parts.into_iter().filter_map(|part| part.text).collect::<String>();
    let usage = response.usage_metadata;

    Ok(CompletionResponse {
        text,
        prompt_tokens: usage.as_ref().map_or(0, |u| u.prompt_token_count),
        completion_tokens: usage.as_ref().map_or(0, |u| u.candidates_token_count),
    })
}

impl LlmClient for GeminiClient {
    fn complete(&self, credential: &Credential, request: &CompletionRequest) -> LlmFuture<'_> {
        let api_key = credential.expose().to_string();
        let url = self.endpoint(&request.model);
        let prompt = request.prompt.clone();

        Box::pin(async move {
            let body = GeminiRequest { contents: vec![GeminiContent { parts: vec![GeminiPart { text: &prompt }] }] };

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> BoxError { format!("Gemini API request failed: {e}").into() })?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| -> BoxError { format!("Failed to read Gemini API response: {e}").into() })?;

            parse_response(status, &text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let client = GeminiClient::new("https://example.test/v1beta/");
        assert_eq!(
            client.endpoint("gemini-2.0-flash-exp"),
            "https://example.test/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = GeminiRequest { contents: vec![GeminiContent { parts: vec![GeminiPart { text: "hi" }] }] };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"contents": [{"parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3, "totalTokenCount": 15}
        })
        .to_string();

        let response = parse_response(200, &body).unwrap();
        assert_eq!(response.text, "Hello world");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 3);
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let body = json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}})
            .to_string();
        let err = parse_response(400, &body).unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error (400): API key not valid");
    }

    #[test]
    fn non_json_error_body_is_passed_through() {
        let err = parse_response(503, "upstream unavailable").unwrap_err();
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let err = parse_response(200, r#"{"candidates": []}"#).unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }
}

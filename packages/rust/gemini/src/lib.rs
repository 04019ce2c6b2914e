//! Gemini text-generation client.
//!
//! The external collaborator is reached through the [`TextGenerator`]
//! capability trait so callers can substitute a deterministic stub in
//! tests. [`GeminiClient`] is the production implementation, speaking the
//! Google Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sapscout_shared::{Result, SapScoutError};

/// Default Generative Language API root.
const DEFAULT_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Timeout for generation requests.
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Text-generation capability: one prompt in, raw response text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one prompt through the model. A model that answers with no
    /// text yields `Ok` with an empty string; transport, auth, quota,
    /// and response-shape problems are [`SapScoutError::Generation`].
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the underlying model, recorded in output metadata.
    fn model_id(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Wire types (generateContent request/response)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, empty when the model
    /// returned no candidates.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_root: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client for the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SapScoutError::Generation(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: DEFAULT_API_ROOT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Point the client at a different API root (for tests/mocks).
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting generation");
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_root, self.model, self.api_key
        );
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SapScoutError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(SapScoutError::Generation(format!(
                "HTTP {status}: {snippet}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SapScoutError::Generation(format!("malformed response: {e}")))?;

        let text = parsed.text();
        debug!(response_len = text.len(), "generation complete");
        Ok(text)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn request_serializes_prompt() {
        let request = GenerateContentRequest::from_prompt("describe MARA");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"contents":[{"parts":[{"text":"describe MARA"}]}]}"#
        );
    }

    #[test]
    fn response_text_concatenates_first_candidate() {
        let json = r#"{"candidates":[
            {"content":{"parts":[{"text":"part one. "},{"text":"part two."}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), "part one. part two.");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "hi there"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "gemini-pro")
            .unwrap()
            .with_api_root(server.uri());

        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "hi there");
        assert_eq!(client.model_id(), "gemini-pro");
    }

    #[tokio::test]
    async fn generate_maps_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"{"error":"key not valid"}"#),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new("bad-key", "gemini-pro")
            .unwrap()
            .with_api_root(server.uri());

        let err = client.generate("hello").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("generation error"), "got: {msg}");
        assert!(msg.contains("403"), "got: {msg}");
    }

    #[tokio::test]
    async fn generate_rejects_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "gemini-pro")
            .unwrap()
            .with_api_root(server.uri());

        let err = client.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn generate_tolerates_empty_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "gemini-pro")
            .unwrap()
            .with_api_root(server.uri());

        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "");
    }
}

//! HTTP client for the Gemini-style generative language API.
//!
//! Both endpoints take the credential as a `key` query parameter:
//! `GET {base}/models` lists the catalog, `POST {base}/{model}:generateContent`
//! produces a completion.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::llm::{ChatError, classify_failure, extract_error_message};
use crate::core::models::{DiscoveryError, ModelInfo};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Guards against a catalog that keeps handing out page tokens.
const MAX_CATALOG_PAGES: usize = 20;
const CATALOG_PAGE_SIZE: &str = "1000";

/// One page of `GET /models`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPage {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client. The credential is trimmed; a blank one is rejected.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChatError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ChatError::MissingCredential);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the full model catalog, following page tokens.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, DiscoveryError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for page_number in 1..=MAX_CATALOG_PAGES {
            let mut req = self
                .http
                .get(&url)
                .query(&[("key", self.api_key.as_str()), ("pageSize", CATALOG_PAGE_SIZE)]);
            if let Some(token) = page_token.as_deref() {
                req = req.query(&[("pageToken", token)]);
            }

            let response = req.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DiscoveryError::Status {
                    status: status.as_u16(),
                    message: extract_error_message(&body).unwrap_or(body),
                });
            }

            let page: ModelPage = response.json().await?;
            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(_) if page_number == MAX_CATALOG_PAGES => {
                    log::warn!(
                        "Model catalog still paging after {} pages; using the {} models read so far",
                        MAX_CATALOG_PAGES,
                        models.len()
                    );
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Model catalog lists {} models", models.len());
        Ok(models)
    }

    /// Ask `model` to continue `text`. `Ok(None)` means the call succeeded but
    /// produced no text (e.g. a blocked prompt).
    pub async fn generate(&self, model: &str, text: &str) -> Result<Option<String>, ChatError> {
        let url = format!("{}/{}:generateContent", self.base_url, model_path(model));
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": text }],
            }],
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_failure(model, None, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body));
            return Err(classify_failure(model, Some(status.as_u16()), &message));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Provider(format!("invalid response from {}: {}", model, e)))?;
        Ok(first_candidate_text(&value))
    }
}

/// Catalog ids carry a `models/` prefix; accept bare ids too.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Concatenated text parts of the first candidate, if any.
fn first_candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn blank_credential_is_rejected() {
        assert!(matches!(
            GeminiClient::new(DEFAULT_BASE_URL, "   "),
            Err(ChatError::MissingCredential)
        ));
    }

    #[test]
    fn model_path_adds_prefix_once() {
        assert_eq!(model_path("gemini-pro"), "models/gemini-pro");
        assert_eq!(model_path("models/gemini-pro"), "models/gemini-pro");
    }

    #[test]
    fn first_candidate_text_joins_parts() {
        let value = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello " }, { "text": "there" }] } }]
        });
        assert_eq!(first_candidate_text(&value).as_deref(), Some("Hello there"));
    }

    #[test]
    fn first_candidate_text_missing_or_empty() {
        assert!(first_candidate_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })).is_none());
        assert!(first_candidate_text(&json!({ "candidates": [] })).is_none());
        let blank = json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] });
        assert!(first_candidate_text(&blank).is_none());
    }

    #[tokio::test]
    async fn list_models_follows_page_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/b", "supportedGenerationMethods": ["generateContent"] }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "k-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/a", "supportedGenerationMethods": ["generateContent"] }],
                "nextPageToken": "p2"
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), " k-1 ").unwrap();
        let models = client.list_models().await.unwrap();
        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["models/a", "models/b"]);
    }

    #[tokio::test]
    async fn list_models_stops_at_page_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/loop", "supportedGenerationMethods": ["generateContent"] }],
                "nextPageToken": "again"
            })))
            .expect(MAX_CATALOG_PAGES as u64)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "k").unwrap();
        let models = client.list_models().await.unwrap();
        assert_eq!(models.len(), MAX_CATALOG_PAGES);
    }

    #[tokio::test]
    async fn list_models_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "bad").unwrap();
        match client.list_models().await {
            Err(DiscoveryError::Status { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn generate_sends_text_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "k-1"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hello!" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "k-1").unwrap();
        let out = client.generate("models/gemini-pro", "hi").await.unwrap();
        assert_eq!(out.as_deref(), Some("Hello!"));
    }
}

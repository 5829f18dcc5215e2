//! Chat and provider error types.

use thiserror::Error;

/// HTTP statuses after which the next candidate model is tried.
const RETRYABLE_STATUSES: [u16; 4] = [429, 404, 503, 400];

/// Provider message fragments after which the next candidate model is tried.
const RETRYABLE_MARKERS: [&str; 4] = ["quota", "not found", "overloaded", "modalities"];

/// Errors from the assistant pipeline.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model rejected the request in a way another model may not (quota,
    /// unknown model, overload, unsupported modality). Never surfaced by the
    /// dispatcher; it advances to the next candidate instead.
    #[error("model {model} unavailable: {message}")]
    Retryable {
        model: String,
        status: Option<u16>,
        message: String,
    },
    /// Any other provider or transport failure.
    #[error("AI provider error: {0}")]
    Provider(String),
    /// Every candidate model failed.
    #[error(
        "All available AI models failed. Check that billing is enabled for your API key \
         and that the Gemini API is supported in your region."
    )]
    AllModelsFailed,
    #[error("No Gemini API key configured. Set GEMINI_API_KEY or run `config set-api-key`.")]
    MissingCredential,
}

/// Classify a failed generation call for `model`.
pub fn classify_failure(model: &str, status: Option<u16>, message: &str) -> ChatError {
    let lowered = message.to_lowercase();
    let status_retryable = status.is_some_and(|s| RETRYABLE_STATUSES.contains(&s));
    let message_retryable = RETRYABLE_MARKERS.iter().any(|m| lowered.contains(m));

    if status_retryable || message_retryable {
        ChatError::Retryable {
            model: model.to_string(),
            status,
            message: message.to_string(),
        }
    } else {
        ChatError::Provider(message.to_string())
    }
}

/// Pull `error.message` out of a provider error body, if it is JSON.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|e| {
        e.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| e.as_str().map(String::from))
    })
}

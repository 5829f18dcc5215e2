//! Community assistant: prompt composition and multi-model fallback dispatch.

pub mod context;
mod error;
pub mod prompt;
mod session;

use crate::core::gemini::GeminiClient;
use crate::core::models;

pub use context::ChatContext;
pub use error::{ChatError, classify_failure, extract_error_message};
pub use session::ModelSession;

/// Returned when a model answers successfully but with no text.
pub const EMPTY_RESPONSE: &str =
    "I received an empty response from the AI model. Please try rephrasing your question.";

/// Answer `message` using the community `context`.
///
/// On first use the session's candidate list is discovered from the provider
/// catalog. Candidates are then tried in order from the session cursor: a
/// retryable failure moves the cursor to the next model, any other failure is
/// returned as is. When the cursor runs off the end the call fails with
/// [`ChatError::AllModelsFailed`] without sending a request.
pub async fn get_chat_response(
    session: &mut ModelSession,
    client: &GeminiClient,
    message: &str,
    context: &ChatContext,
) -> Result<String, ChatError> {
    if session.needs_discovery() {
        session.populate(models::discover_or_default(client).await);
    }

    let request_text = prompt::compose_request_text(context, message);

    while let Some(model) = session.current().map(str::to_owned) {
        log::debug!(
            "Sending chat request to {} (candidate {}/{})",
            model,
            session.cursor() + 1,
            session.candidates().len()
        );
        match client.generate(&model, &request_text).await {
            Ok(Some(content)) => return Ok(content),
            Ok(None) => {
                log::warn!("{} returned no content", model);
                return Ok(EMPTY_RESPONSE.to_string());
            }
            Err(ChatError::Retryable {
                status, message, ..
            }) => {
                log::warn!(
                    "{} unavailable (status {:?}): {}; trying next model",
                    model,
                    status,
                    message
                );
                session.advance();
            }
            Err(err) => return Err(err),
        }
    }

    Err(ChatError::AllModelsFailed)
}

//! Model discovery: fetch the provider catalog and order usable models by priority.

use crate::core::gemini::GeminiClient;
use crate::core::util;

use super::info::ModelInfo;

/// Known-good models, tried first and in this order when the catalog lists them.
pub const PRIORITY_MODELS: &[&str] = &[
    "models/gemini-2.0-flash",
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro",
    "models/gemini-pro",
    "models/gemini-1.0-pro",
];

/// Sole candidate when the catalog cannot be fetched.
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// The catalog could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("model catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model catalog returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Filter models by query (case-insensitive match on id or display name).
pub fn filter_models<'a>(models: &'a [ModelInfo], query: &str) -> Vec<&'a ModelInfo> {
    util::filter_by_query(models, query, |m| (m.name.as_str(), m.display_name.as_str()))
}

/// Order a catalog into chat candidates.
///
/// Priority entries present in the catalog come first, in priority order. Every
/// other entry that supports `generateContent` follows in catalog order.
/// Audio-only models are never candidates, and no id appears twice.
pub fn order_candidates(catalog: &[ModelInfo]) -> Vec<String> {
    order_with_priority(catalog, PRIORITY_MODELS)
}

fn order_with_priority(catalog: &[ModelInfo], priority: &[&str]) -> Vec<String> {
    let mut ordered: Vec<String> = priority
        .iter()
        .filter(|id| !super::info::is_audio_only(id))
        .filter(|id| catalog.iter().any(|m| m.name == **id))
        .map(|id| id.to_string())
        .collect();

    for model in catalog {
        if !model.supports_generation() || model.is_audio_only() {
            continue;
        }
        if ordered.iter().any(|id| *id == model.name) {
            continue;
        }
        ordered.push(model.name.clone());
    }
    ordered
}

/// Fetch the catalog and order it into candidates.
pub async fn discover_models(client: &GeminiClient) -> Result<Vec<String>, DiscoveryError> {
    let catalog = client.list_models().await?;
    Ok(order_candidates(&catalog))
}

/// Like [`discover_models`], but a failed fetch yields `[DEFAULT_MODEL]`.
pub async fn discover_or_default(client: &GeminiClient) -> Vec<String> {
    match discover_models(client).await {
        Ok(models) => {
            log::info!("Discovered {} candidate models", models.len());
            models
        }
        Err(e) => {
            log::warn!("Model discovery failed, using {}: {}", DEFAULT_MODEL, e);
            vec![DEFAULT_MODEL.to_string()]
        }
    }
}

/// Fetch the catalog entries usable for chat, in candidate order.
pub async fn fetch_chat_models(client: &GeminiClient) -> Result<Vec<ModelInfo>, DiscoveryError> {
    let catalog = client.list_models().await?;
    let order = order_candidates(&catalog);
    Ok(order
        .iter()
        .filter_map(|id| catalog.iter().find(|m| m.name == *id).cloned())
        .collect())
}

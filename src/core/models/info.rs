//! Catalog entry type (no dependencies on the HTTP client).

use serde::{Deserialize, Serialize};

/// Generation method a model must advertise to be usable for chat.
pub const GENERATE_CONTENT: &str = "generateContent";

/// One entry of the provider's model catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Opaque identifier, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
    #[serde(default)]
    pub input_token_limit: u64,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }

    pub fn is_audio_only(&self) -> bool {
        is_audio_only(&self.name)
    }
}

/// Speech and audio models share the catalog but cannot answer text chat.
pub fn is_audio_only(id: &str) -> bool {
    let id = id.to_lowercase();
    id.contains("tts") || id.contains("audio")
}

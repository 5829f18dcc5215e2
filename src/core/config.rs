use std::env;
use std::path::PathBuf;

use crate::core::api_key;
use crate::core::community::CommunitySnapshot;
use crate::core::gemini;
use crate::core::llm::ChatError;
use crate::core::paths;
use crate::core::webhooks::WebhookUrls;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const DATA_VAR: &str = "COMMUNITY_DATA";

/// Where the provider credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Stored,
    Community,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env => write!(f, "from {}", API_KEY_VAR),
            KeySource::Stored => write!(f, "from stored key file"),
            KeySource::Community => write!(f, "from community AI settings"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Credential from the environment or the stored key file.
    pub api_key: Option<String>,
    pub snapshot_path: PathBuf,
    pub webhooks: WebhookUrls,
}

#[derive(Debug)]
pub enum ConfigError {
    NoDataDir,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoDataDir => write!(
                f,
                "No data directory available; set {} to the community snapshot path",
                DATA_VAR
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load configuration from environment (after `.env`) and the config directory.
pub fn load() -> Result<Config, ConfigError> {
    let base_url =
        non_empty_var(BASE_URL_VAR).unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());

    let api_key = non_empty_var(API_KEY_VAR).or_else(api_key::load_api_key);

    let snapshot_path = match non_empty_var(DATA_VAR) {
        Some(p) => PathBuf::from(p),
        None => paths::default_snapshot_path().ok_or(ConfigError::NoDataDir)?,
    };

    let webhooks = WebhookUrls {
        registration: non_empty_var("WEBHOOK_REGISTRATION_URL"),
        login: non_empty_var("WEBHOOK_LOGIN_URL"),
        profile_update: non_empty_var("WEBHOOK_PROFILE_UPDATE_URL"),
        message_sent: non_empty_var("WEBHOOK_MESSAGE_SENT_URL"),
        message_received: non_empty_var("WEBHOOK_MESSAGE_RECEIVED_URL"),
    };

    Ok(Config {
        base_url,
        api_key,
        snapshot_path,
        webhooks,
    })
}

impl Config {
    /// Credential for the provider: local configuration first, then the key
    /// stored in the community's AI settings.
    pub fn resolve_api_key(
        &self,
        snapshot: Option<&CommunitySnapshot>,
    ) -> Result<(String, KeySource), ChatError> {
        if let Some(key) = self.api_key.as_deref() {
            let source = if non_empty_var(API_KEY_VAR).is_some() {
                KeySource::Env
            } else {
                KeySource::Stored
            };
            return Ok((key.to_string(), source));
        }
        snapshot
            .and_then(|s| s.ai_settings.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| (k.to_string(), KeySource::Community))
            .ok_or(ChatError::MissingCredential)
    }
}

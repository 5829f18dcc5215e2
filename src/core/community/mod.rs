//! Read-only view of the community: snapshot records, derived assistant
//! context, feed pagination, and direct-message conversations.

pub mod feed;
pub mod messages;
pub mod snapshot;
pub mod stats;
pub mod store;

use std::sync::OnceLock;

use regex::Regex;

pub use snapshot::CommunitySnapshot;
pub use store::{CommunityStore, JsonFileStore};

/// Name used when the community has none configured.
pub const DEFAULT_COMMUNITY_NAME: &str = "Community";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Trim and collapse internal whitespace; blank names become [`DEFAULT_COMMUNITY_NAME`].
pub fn normalize_community_name(raw: &str) -> String {
    let collapsed = whitespace_re().replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        DEFAULT_COMMUNITY_NAME.to_string()
    } else {
        collapsed.into_owned()
    }
}

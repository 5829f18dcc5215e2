//! Model discovery and filtering.

mod fetch;
mod info;

pub use fetch::{DiscoveryError, discover_or_default, fetch_chat_models, filter_models};
pub use info::ModelInfo;

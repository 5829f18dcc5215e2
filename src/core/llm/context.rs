//! Community context handed to the assistant: the data the prompt is built from.
//!
//! Every field is optional. Absent (or blank) fields are left out of the prompt.

use serde::{Deserialize, Serialize};

/// Everything the assistant may know about the community for one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatContext {
    pub community_name: Option<String>,
    /// Free-text instructions written by the community admin.
    pub instructions: Option<String>,
    pub news: Option<String>,
    pub stats: Option<CommunityStats>,
    pub trending_posts: Option<Vec<TrendingPost>>,
    pub active_members: Option<Vec<ActiveMember>>,
    pub recent_posts: Option<Vec<FeedPost>>,
}

/// Live counters over the whole post collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    pub total_posts: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_image_posts: u64,
    pub total_text_posts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingPost {
    pub content: String,
    pub author: String,
    pub likes: u64,
    pub comment_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMember {
    pub name: String,
    /// Number of posts authored.
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

//! Derive the assistant's [`ChatContext`] from a community snapshot.

use std::collections::HashMap;

use super::normalize_community_name;
use super::snapshot::{CommunitySnapshot, Post};
use crate::core::llm::context::{
    ActiveMember, ChatContext, CommunityStats, FeedPost, TrendingPost,
};

pub const TRENDING_LIMIT: usize = 5;
pub const ACTIVE_MEMBERS_LIMIT: usize = 5;
pub const RECENT_FEED_LIMIT: usize = 10;

/// Everything the prompt composer can use, in one pass over the snapshot.
pub fn build_chat_context(snapshot: &CommunitySnapshot) -> ChatContext {
    let posts = &snapshot.posts;
    ChatContext {
        community_name: Some(normalize_community_name(
            snapshot.community.name.as_deref().unwrap_or_default(),
        )),
        instructions: snapshot.ai_settings.instructions.clone(),
        news: snapshot.ai_settings.news.clone(),
        stats: Some(live_stats(posts)),
        trending_posts: Some(trending_posts(posts, TRENDING_LIMIT)),
        active_members: Some(active_members(posts, ACTIVE_MEMBERS_LIMIT)),
        recent_posts: Some(recent_posts(posts, RECENT_FEED_LIMIT)),
    }
}

pub fn live_stats(posts: &[Post]) -> CommunityStats {
    let image_posts = posts.iter().filter(|p| p.has_image()).count() as u64;
    CommunityStats {
        total_posts: posts.len() as u64,
        total_likes: posts.iter().map(|p| p.likes.len() as u64).sum(),
        total_comments: posts.iter().map(|p| p.comments.len() as u64).sum(),
        total_image_posts: image_posts,
        total_text_posts: posts.len() as u64 - image_posts,
    }
}

/// Most-liked posts; ties go to the newer post.
pub fn trending_posts(posts: &[Post], limit: usize) -> Vec<TrendingPost> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| {
        b.likes
            .len()
            .cmp(&a.likes.len())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
        .into_iter()
        .take(limit)
        .map(|p| TrendingPost {
            content: p.content.clone(),
            author: p.author.clone(),
            likes: p.likes.len() as u64,
            comment_count: p.comments.len() as u64,
        })
        .collect()
}

/// Authors with the most posts; ties by name.
pub fn active_members(posts: &[Post], limit: usize) -> Vec<ActiveMember> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for post in posts {
        *counts.entry(post.author.as_str()).or_default() += 1;
    }
    let mut members: Vec<ActiveMember> = counts
        .into_iter()
        .map(|(name, count)| ActiveMember {
            name: name.to_string(),
            count,
        })
        .collect();
    members.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    members.truncate(limit);
    members
}

pub fn recent_posts(posts: &[Post], limit: usize) -> Vec<FeedPost> {
    super::feed::newest_first(posts)
        .into_iter()
        .take(limit)
        .map(|p| FeedPost {
            content: p.content.clone(),
            author: p.author.clone(),
            tags: p.tags.clone(),
        })
        .collect()
}

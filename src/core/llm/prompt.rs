//! System prompt composition.
//!
//! Sections are appended in a fixed order and only when their source field is
//! present and non-empty, so the same context always renders the same prompt.

use super::context::{ActiveMember, ChatContext, CommunityStats, FeedPost, TrendingPost};
use crate::core::util::{non_blank, truncate_chars};

/// Opening role description, always present.
pub const ROLE_DESCRIPTION: &str = "You are the AI assistant of an online community. \
You help members with questions about the community, its posts, and its members.";

/// Closing rules, always last.
pub const CLOSING_RULES: &str = "Rules: answer only from the community data provided above. \
Never make up statistics, posts, or member names. \
If the answer is not in the data, say that you don't know.";

/// Post content is cut to this many characters in trending and feed sections.
pub const CONTENT_PREVIEW_CHARS: usize = 50;

const SECTION_SEPARATOR: &str = "\n\n";

/// Render the system prompt for a context.
pub fn compose_system_prompt(ctx: &ChatContext) -> String {
    let mut sections: Vec<String> = vec![ROLE_DESCRIPTION.to_string()];

    if let Some(name) = non_blank(ctx.community_name.as_deref()) {
        sections.push(format!("Community: {}", name));
    }
    if let Some(instructions) = non_blank(ctx.instructions.as_deref()) {
        sections.push(format!("Instructions from the community admin:\n{}", instructions));
    }
    if let Some(news) = non_blank(ctx.news.as_deref()) {
        sections.push(format!("Latest community news:\n{}", news));
    }
    if let Some(stats) = &ctx.stats {
        sections.push(stats_section(stats));
    }
    if let Some(posts) = ctx.trending_posts.as_deref().filter(|p| !p.is_empty()) {
        sections.push(trending_section(posts));
    }
    if let Some(members) = ctx.active_members.as_deref().filter(|m| !m.is_empty()) {
        sections.push(members_section(members));
    }
    if let Some(posts) = ctx.recent_posts.as_deref().filter(|p| !p.is_empty()) {
        sections.push(feed_section(posts));
    }

    sections.push(CLOSING_RULES.to_string());
    sections.join(SECTION_SEPARATOR)
}

/// Full text sent to the model: system prompt followed by the member's question.
pub fn compose_request_text(ctx: &ChatContext, question: &str) -> String {
    format!(
        "{}{}User question: {}",
        compose_system_prompt(ctx),
        SECTION_SEPARATOR,
        question.trim()
    )
}

fn stats_section(stats: &CommunityStats) -> String {
    format!(
        "Live community stats:\n\
         - Total posts: {}\n\
         - Total likes: {}\n\
         - Total comments: {}\n\
         - Image posts: {}\n\
         - Text posts: {}",
        stats.total_posts,
        stats.total_likes,
        stats.total_comments,
        stats.total_image_posts,
        stats.total_text_posts
    )
}

fn trending_section(posts: &[TrendingPost]) -> String {
    let lines: Vec<String> = posts
        .iter()
        .map(|p| {
            format!(
                "- \"{}\" by {} ({} likes, {} comments)",
                truncate_chars(&p.content, CONTENT_PREVIEW_CHARS),
                p.author,
                p.likes,
                p.comment_count
            )
        })
        .collect();
    format!("Trending posts:\n{}", lines.join("\n"))
}

fn members_section(members: &[ActiveMember]) -> String {
    let lines: Vec<String> = members
        .iter()
        .map(|m| format!("- {}: {} posts", m.name, m.count))
        .collect();
    format!("Most active members:\n{}", lines.join("\n"))
}

fn feed_section(posts: &[FeedPost]) -> String {
    let lines: Vec<String> = posts
        .iter()
        .map(|p| {
            let preview = truncate_chars(&p.content, CONTENT_PREVIEW_CHARS);
            if p.tags.is_empty() {
                format!("- {}: \"{}\"", p.author, preview)
            } else {
                format!("- {}: \"{}\" [tags: {}]", p.author, preview, p.tags.join(", "))
            }
        })
        .collect();
    format!("Recent feed posts:\n{}", lines.join("\n"))
}

//! Feed ordering and pagination.

use super::snapshot::Post;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of the feed.
#[derive(Debug)]
pub struct Page<'a> {
    /// 1-based page number actually served.
    pub number: usize,
    pub items: Vec<&'a Post>,
    pub has_more: bool,
}

/// Posts sorted newest first (stable for equal timestamps).
pub fn newest_first(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Page `page` (1-based; 0 is treated as 1) of the newest-first feed.
pub fn paginate(posts: &[Post], page: usize, page_size: usize) -> Page<'_> {
    let number = page.max(1);
    let page_size = page_size.max(1);
    let sorted = newest_first(posts);
    let start = (number - 1).saturating_mul(page_size);
    let items: Vec<&Post> = sorted.iter().skip(start).take(page_size).copied().collect();
    let has_more = start.saturating_add(items.len()) < sorted.len();
    Page {
        number,
        items,
        has_more,
    }
}

/// Posts carrying `tag` (case-insensitive, leading `#` ignored).
pub fn with_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    let wanted = tag.trim_start_matches('#').to_lowercase();
    posts
        .iter()
        .filter(|p| {
            p.tags
                .iter()
                .any(|t| t.trim_start_matches('#').to_lowercase() == wanted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::community::test_support::post;

    fn posts(n: usize) -> Vec<Post> {
        (0..n)
            .map(|i| post(&i.to_string(), "ana", &format!("post {i}"), i as i64))
            .collect()
    }

    #[test]
    fn first_page_is_newest() {
        let all = posts(5);
        let page = paginate(&all, 1, 2);
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3"]);
        assert!(page.has_more);
    }

    #[test]
    fn last_page_has_no_more() {
        let all = posts(5);
        let page = paginate(&all, 3, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "0");
        assert!(!page.has_more);
    }

    #[test]
    fn page_zero_is_first_page() {
        let all = posts(3);
        assert_eq!(paginate(&all, 0, 10).number, 1);
        assert_eq!(paginate(&all, 0, 10).items.len(), 3);
    }

    #[test]
    fn past_the_end_is_empty() {
        let all = posts(3);
        let page = paginate(&all, 9, 2);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn tag_filter_ignores_hash_and_case() {
        let mut all = posts(2);
        all[1].tags = vec!["#Food".into()];
        let tagged = with_tag(&all, "food");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, "1");
    }
}

//! Per-conversation model state: discovered candidates and the fallback cursor.

/// Candidate models plus the index of the one currently in use.
///
/// The list is filled lazily by the first request. The cursor only moves
/// forward; once a model has been skipped it is not tried again by this
/// session.
#[derive(Debug, Clone, Default)]
pub struct ModelSession {
    candidates: Vec<String>,
    cursor: usize,
}

impl ModelSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with a known candidate list; skips discovery.
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            cursor: 0,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Model to try next, or `None` once every candidate has been skipped.
    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.cursor).map(String::as_str)
    }

    /// True until a non-empty candidate list has been installed.
    pub fn needs_discovery(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Install a freshly discovered list and start from its head.
    pub(super) fn populate(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
        self.cursor = 0;
    }

    pub(super) fn advance(&mut self) {
        self.cursor = self.cursor.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_needs_discovery() {
        let session = ModelSession::new();
        assert!(session.needs_discovery());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn advance_walks_the_list_and_stops_at_end() {
        let mut session = ModelSession::with_candidates(vec!["a".into(), "b".into()]);
        assert_eq!(session.current(), Some("a"));
        session.advance();
        assert_eq!(session.current(), Some("b"));
        session.advance();
        assert_eq!(session.current(), None);
        assert_eq!(session.cursor(), 2);
        assert!(!session.needs_discovery());
    }

    #[test]
    fn populate_resets_cursor() {
        let mut session = ModelSession::new();
        session.advance();
        session.populate(vec!["m".into()]);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.candidates(), ["m".to_string()]);
    }
}

//! Per-session state: history, identity, and the source-display cache.

use crate::history::ConversationHistory;
use chrono::{DateTime, Utc};
use colloquy_retrieval::RetrievedMatch;
use std::collections::HashMap;

/// State for one chat session.
///
/// Threaded explicitly through every pipeline stage; there is no
/// ambient/global session state. Access is single-threaded per session
/// (one turn runs to completion before the next input is accepted).
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,

    /// Ordered turn log backing all prompt construction
    pub history: ConversationHistory,

    /// Filtered matches per asked question, kept for source display.
    /// Keyed by the original (non-enhanced) question text; the most
    /// recent write wins on duplicate keys.
    context_cache: HashMap<String, Vec<RetrievedMatch>>,
}

impl Session {
    /// Create a fresh session with a generated identifier.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            history: ConversationHistory::new(),
            context_cache: HashMap::new(),
        }
    }

    /// Opaque session identifier, stable for the session's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the session started.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record the filtered matches retrieved for a question.
    pub fn cache_matches(&mut self, question: &str, matches: Vec<RetrievedMatch>) {
        self.context_cache.insert(question.to_string(), matches);
    }

    /// Matches previously cached for a question, if any.
    pub fn cached_matches(&self, question: &str) -> Option<&[RetrievedMatch]> {
        self.context_cache.get(question).map(|m| m.as_slice())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_empty() {
        let session = Session::new();
        assert!(session.history.is_empty());
        assert!(!session.id().is_empty());
        assert!(session.cached_matches("anything").is_none());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_cache_most_recent_write_wins() {
        let mut session = Session::new();
        session.cache_matches("q", vec![RetrievedMatch::new(0.9, "Old", "https://x/o", "o")]);
        session.cache_matches("q", vec![RetrievedMatch::new(0.8, "New", "https://x/n", "n")]);

        let cached = session.cached_matches("q").unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].metadata.title, "New");
    }
}

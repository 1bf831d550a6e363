//! Per-session memory maintained inside the completion pipeline.
//!
//! The answer generator also assembles an explicit transcript by hand;
//! this store deliberately duplicates that record. Keeping both is a
//! documented contract: the pipeline-side memory is written on every
//! generation so it mirrors exactly what the explicit transcript saw,
//! and the two can be compared if they ever diverge.

use std::collections::HashMap;
use std::sync::Mutex;

/// Role of a remembered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRole {
    User,
    Assistant,
}

/// One remembered message.
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    pub role: MemoryRole,
    pub content: String,
}

/// Session-correlated message log.
///
/// Keyed by the opaque session identifier. Safe for concurrent use by
/// independent sessions; entries for one session are only touched by
/// that session's (single-threaded) turn pipeline.
#[derive(Debug, Default)]
pub struct SessionMemory {
    sessions: Mutex<HashMap<String, Vec<MemoryMessage>>>,
}

impl SessionMemory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one question/answer exchange for a session.
    pub fn record_exchange(&self, session_id: &str, question: &str, answer: &str) {
        let mut sessions = self.sessions.lock().expect("session memory poisoned");
        let log = sessions.entry(session_id.to_string()).or_default();
        log.push(MemoryMessage {
            role: MemoryRole::User,
            content: question.to_string(),
        });
        log.push(MemoryMessage {
            role: MemoryRole::Assistant,
            content: answer.to_string(),
        });
    }

    /// All remembered messages for a session, in insertion order.
    pub fn messages(&self, session_id: &str) -> Vec<MemoryMessage> {
        let sessions = self.sessions.lock().expect("session memory poisoned");
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Number of remembered messages for a session.
    pub fn len(&self, session_id: &str) -> usize {
        let sessions = self.sessions.lock().expect("session memory poisoned");
        sessions.get(session_id).map(|log| log.len()).unwrap_or(0)
    }

    /// Whether a session has no remembered messages.
    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_back() {
        let memory = SessionMemory::new();
        memory.record_exchange("s1", "What is GitLab?", "A DevOps platform.");

        let messages = memory.messages("s1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MemoryRole::User);
        assert_eq!(messages[0].content, "What is GitLab?");
        assert_eq!(messages[1].role, MemoryRole::Assistant);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let memory = SessionMemory::new();
        memory.record_exchange("s1", "q1", "a1");
        memory.record_exchange("s2", "q2", "a2");

        assert_eq!(memory.len("s1"), 2);
        assert_eq!(memory.len("s2"), 2);
        assert!(memory.is_empty("s3"));
    }

    #[test]
    fn test_exchanges_accumulate_in_order() {
        let memory = SessionMemory::new();
        memory.record_exchange("s1", "first", "one");
        memory.record_exchange("s1", "second", "two");

        let messages = memory.messages("s1");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].content, "second");
    }
}

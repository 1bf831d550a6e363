//! Conversation history: the ordered log of turns behind every prompt.

use serde::{Deserialize, Serialize};

/// Literal text of the synthetic welcome turn injected on first display.
pub const WELCOME_MESSAGE: &str = "Welcome";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

/// One message in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Ordered, insertion-ordered log of turns for one session.
///
/// Turns alternate human/AI in well-formed use, but nothing here assumes
/// strict alternation: consecutive same-role entries (e.g., an injected
/// welcome message) must not corrupt transcript formatting.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. No content validation; visible to all later reads.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn {
            role,
            text: text.into(),
        });
    }

    /// The ordered sequence of turns. Callers must not mutate it.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns stored.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Inject the synthetic AI welcome turn if the history is empty.
    ///
    /// Returns whether an injection happened. The injection point is the
    /// history, not the UI, so the welcome text becomes transcript
    /// context for follow-up query enhancement.
    pub fn ensure_welcome(&mut self) -> bool {
        if self.turns.is_empty() {
            self.append(Role::Ai, WELCOME_MESSAGE);
            true
        } else {
            false
        }
    }

    /// Render the history as paired "Human:"/"Assistant:" lines.
    ///
    /// Pairing is positional: turns are folded two at a time by index,
    /// not grouped by role. A slot whose turn does not carry the expected
    /// role renders as the empty string, as does a missing second slot.
    /// Downstream prompt formatting depends on this exact tolerant
    /// pairing; do not tighten it into role-based grouping.
    pub fn format_transcript(&self) -> String {
        let mut transcript = String::new();

        for pair in self.turns.chunks(2) {
            let human = pair
                .first()
                .filter(|turn| turn.role == Role::Human)
                .map(|turn| turn.text.as_str())
                .unwrap_or("");
            let ai = pair
                .get(1)
                .filter(|turn| turn.role == Role::Ai)
                .map(|turn| turn.text.as_str())
                .unwrap_or("");

            transcript.push_str(&format!("Human: {}\nAssistant: {}\n\n", human, ai));
        }

        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_round_trip() {
        let mut history = ConversationHistory::new();
        history.append(Role::Human, "What is GitLab?");
        history.append(Role::Ai, "A DevOps platform.");

        assert_eq!(
            history.format_transcript(),
            "Human: What is GitLab?\nAssistant: A DevOps platform.\n\n"
        );
    }

    #[test]
    fn test_empty_history_formats_empty() {
        let history = ConversationHistory::new();
        assert_eq!(history.format_transcript(), "");
    }

    #[test]
    fn test_odd_count_renders_empty_assistant_slot() {
        let mut history = ConversationHistory::new();
        history.append(Role::Human, "hello");

        assert_eq!(history.format_transcript(), "Human: hello\nAssistant: \n\n");
    }

    #[test]
    fn test_mismatched_roles_render_empty_slots() {
        // Consecutive AI turns: first pair slot expects Human, gets Ai
        let mut history = ConversationHistory::new();
        history.append(Role::Ai, "Welcome");
        history.append(Role::Ai, "Still here");

        assert_eq!(history.format_transcript(), "Human: \nAssistant: Still here\n\n");
    }

    #[test]
    fn test_welcome_then_exchange_keeps_positional_pairing() {
        let mut history = ConversationHistory::new();
        history.ensure_welcome();
        history.append(Role::Human, "hi");
        history.append(Role::Ai, "hello");

        // Pair 1 is (Welcome, hi): both slots mismatch their expected role.
        // Pair 2 is a lone AI turn sitting in the human slot. Every slot
        // renders empty.
        assert_eq!(
            history.format_transcript(),
            "Human: \nAssistant: \n\nHuman: \nAssistant: \n\n"
        );
    }

    #[test]
    fn test_welcome_injected_once() {
        let mut history = ConversationHistory::new();
        assert!(history.ensure_welcome());
        assert!(!history.ensure_welcome());

        assert_eq!(history.len(), 1);
        assert_eq!(history.turns()[0].role, Role::Ai);
        assert_eq!(history.turns()[0].text, WELCOME_MESSAGE);
    }
}

//! Query enhancement: rewrite a bare question into a self-contained
//! search query using the conversation so far.

use crate::history::ConversationHistory;
use colloquy_core::AppResult;
use colloquy_llm::{CompletionClient, CompletionRequest};
use std::sync::Arc;

/// Minimum number of turns before enhancement is worth a model call.
const MIN_TURNS_FOR_ENHANCEMENT: usize = 2;

/// Rewrites questions into context-enriched search queries.
pub struct QueryEnhancer {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl QueryEnhancer {
    /// Create an enhancer over a completion client.
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Produce the search query for a question.
    ///
    /// Cold-start short-circuit: with fewer than two turns of history
    /// the question is returned verbatim and no model call is made.
    /// Completion failures propagate uncaught; the turn pipeline owns
    /// the user-visible failure path.
    pub async fn enhance(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> AppResult<String> {
        if history.len() < MIN_TURNS_FOR_ENHANCEMENT {
            tracing::debug!("History too short for enhancement, using question verbatim");
            return Ok(question.to_string());
        }

        let transcript = history.format_transcript();
        let prompt = format!(
            "Given the following conversation history and new question, \
             create a search query that captures the full context:\n\n\
             History:\n{transcript}\n\
             New question: {question}\n\n\
             Search query:"
        );

        tracing::info!("Enhancing query with {} turns of history", history.len());

        let request = CompletionRequest::new(prompt, &self.model).with_temperature(0.0);
        let response = self.client.invoke(&request).await?;

        tracing::debug!("Enhanced query: {}", response.content);

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;
    use colloquy_core::AppError;
    use colloquy_llm::{CompletionResponse, CompletionStream};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Completion fake that counts calls and returns a fixed rewrite.
    struct CountingCompletion {
        calls: AtomicUsize,
    }

    impl CountingCompletion {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CompletionClient for CountingCompletion {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn invoke(&self, _request: &CompletionRequest) -> AppResult<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: "rewritten query".to_string(),
                model: "fake".to_string(),
            })
        }

        async fn stream(&self, _request: &CompletionRequest) -> AppResult<CompletionStream> {
            Err(AppError::Llm("stream not used here".to_string()))
        }
    }

    #[tokio::test]
    async fn test_short_history_returns_question_verbatim() {
        let client = Arc::new(CountingCompletion::new());
        let enhancer = QueryEnhancer::new(client.clone(), "m");

        let empty = ConversationHistory::new();
        let result = enhancer.enhance("what about runners?", &empty).await.unwrap();
        assert_eq!(result, "what about runners?");

        let mut one_turn = ConversationHistory::new();
        one_turn.append(Role::Ai, "Welcome");
        let result = enhancer.enhance("what about runners?", &one_turn).await.unwrap();
        assert_eq!(result, "what about runners?");

        // No model calls on the cold-start path
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enhancement_invokes_model_once() {
        let client = Arc::new(CountingCompletion::new());
        let enhancer = QueryEnhancer::new(client.clone(), "m");

        let mut history = ConversationHistory::new();
        history.append(Role::Human, "What is GitLab CI?");
        history.append(Role::Ai, "A pipeline system.");

        let result = enhancer.enhance("how do I configure it?", &history).await.unwrap();
        assert_eq!(result, "rewritten query");
        assert_eq!(client.call_count(), 1);
    }
}

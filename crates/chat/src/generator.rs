//! Answer generation: the fixed RAG prompt and the completion call.

use crate::history::ConversationHistory;
use colloquy_core::AppResult;
use colloquy_llm::{CompletionClient, CompletionRequest, SessionMemory};
use futures::StreamExt;
use std::sync::Arc;

/// Generates the final answer from history, retrieved context, and the
/// current question.
///
/// Owns the completion-pipeline's session memory: every generation is
/// recorded there in addition to the explicit transcript the caller
/// maintains. The duplication is a documented contract (the two records
/// are written together so they cannot silently diverge), not an
/// accident to clean up.
pub struct AnswerGenerator {
    client: Arc<dyn CompletionClient>,
    model: String,
    memory: SessionMemory,
}

impl AnswerGenerator {
    /// Create a generator over a completion client.
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            memory: SessionMemory::new(),
        }
    }

    /// The completion-pipeline session memory.
    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    /// Generate an answer with streaming enabled.
    ///
    /// Does NOT append to the conversation history; the caller appends
    /// the question and answer after this returns, so the history keeps
    /// its canonical pivot-language text. Completion failures propagate
    /// uncaught.
    pub async fn answer(
        &self,
        context: &str,
        question: &str,
        history: &ConversationHistory,
        session_id: &str,
    ) -> AppResult<String> {
        let chat_history = history.format_transcript();
        let prompt = build_rag_prompt(&chat_history, context, question);

        tracing::info!(
            "Generating answer (session: {}, context bytes: {})",
            session_id,
            context.len()
        );

        let request = CompletionRequest::new(prompt, &self.model)
            .with_temperature(0.0)
            .with_streaming();

        let mut stream = self.client.stream(&request).await?;
        let mut answer = String::new();

        while let Some(result) = stream.next().await {
            let chunk = result?;
            answer.push_str(&chunk.content);
            if chunk.done {
                break;
            }
        }

        // Mirror the exchange into the pipeline-side session memory
        self.memory.record_exchange(session_id, question, &answer);

        tracing::info!("Generated answer ({} bytes)", answer.len());

        Ok(answer)
    }
}

/// Build the fixed four-slot RAG prompt.
fn build_rag_prompt(chat_history: &str, context: &str, question: &str) -> String {
    format!(
        "You are an assistant for question-answering tasks. Use the following \
         conversation history and retrieved context to answer the question.\n\
         If addressing a follow-up question, use both the conversation history \
         and new context to provide a coherent response.\n\
         If you don't know the answer, just say that you don't know. Use two \
         sentences maximum and keep the answer concise.\n\n\
         <conversation_history>\n\
         {chat_history}\n\
         </conversation_history>\n\n\
         <context>\n\
         {context}\n\
         </context>\n\n\
         Current question: {question}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;
    use colloquy_core::AppError;
    use colloquy_llm::{CompletionChunk, CompletionResponse, CompletionStream};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Completion fake that streams a scripted answer in two chunks.
    struct StreamingFake {
        stream_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CompletionClient for StreamingFake {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn invoke(&self, _request: &CompletionRequest) -> AppResult<CompletionResponse> {
            Err(AppError::Llm("invoke not used here".to_string()))
        }

        async fn stream(&self, _request: &CompletionRequest) -> AppResult<CompletionStream> {
            self.stream_calls.fetch_add(1, Ordering::SeqCst);
            let chunks = vec![
                Ok(CompletionChunk {
                    content: "GitLab is ".to_string(),
                    done: false,
                }),
                Ok(CompletionChunk {
                    content: "a DevOps platform.".to_string(),
                    done: true,
                }),
            ];
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    #[tokio::test]
    async fn test_answer_collects_stream_and_records_memory() {
        let client = Arc::new(StreamingFake {
            stream_calls: AtomicUsize::new(0),
        });
        let generator = AnswerGenerator::new(client.clone(), "m");

        let mut history = ConversationHistory::new();
        history.append(Role::Human, "hi");
        history.append(Role::Ai, "hello");

        let answer = generator
            .answer("Title: T\nURL: u\nText: x\n\n", "What is GitLab?", &history, "s1")
            .await
            .unwrap();

        assert_eq!(answer, "GitLab is a DevOps platform.");
        assert_eq!(client.stream_calls.load(Ordering::SeqCst), 1);

        // The pipeline-side memory mirrors the exchange
        let messages = generator.memory().messages("s1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "What is GitLab?");
        assert_eq!(messages[1].content, "GitLab is a DevOps platform.");
    }

    #[test]
    fn test_rag_prompt_slots() {
        let prompt = build_rag_prompt(
            "Human: a\nAssistant: b\n\n",
            "Title: T\nURL: u\nText: x\n\n",
            "next question",
        );

        assert!(prompt.contains("<conversation_history>\nHuman: a\nAssistant: b\n\n\n"));
        assert!(prompt.contains("<context>\nTitle: T\nURL: u\nText: x\n\n\n</context>"));
        assert!(prompt.contains("Current question: next question\n"));
        assert!(prompt.contains("Use two sentences maximum"));
    }
}

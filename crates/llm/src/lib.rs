//! Completion-service integration crate for Colloquy.
//!
//! Provides a provider-agnostic abstraction over the hosted language
//! model the chat pipeline talks to, plus the session-correlated memory
//! the completion layer keeps alongside the explicit transcript.
//!
//! # Providers
//! - **Ollama**: local LLM runtime (default)
//! - **OpenAI**: hosted chat completions
//!
//! # Example
//! ```no_run
//! use colloquy_llm::{CompletionClient, CompletionRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = CompletionRequest::new("Hello, world!", "llama3.2");
//! let response = client.invoke(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod memory;
pub mod providers;

// Re-export main types
pub use client::{
    CompletionChunk, CompletionClient, CompletionRequest, CompletionResponse, CompletionStream,
};
pub use factory::create_client;
pub use memory::{MemoryMessage, MemoryRole, SessionMemory};
pub use providers::{OllamaClient, OpenAiClient};

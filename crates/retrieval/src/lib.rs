//! Retrieval crate for Colloquy.
//!
//! Wraps the two black-box services behind the RAG pipeline's search
//! step — the embedding model and the nearest-neighbor vector index —
//! and provides the `Retriever` that composes them with score-threshold
//! filtering.

pub mod embedding;
pub mod index;
pub mod retriever;
pub mod types;

// Re-export commonly used types
pub use embedding::{create_embedder, EmbeddingClient, OllamaEmbedder, TrigramEmbedder};
pub use index::{PineconeIndex, VectorIndex};
pub use retriever::Retriever;
pub use types::{RetrievedMatch, SourceMetadata};

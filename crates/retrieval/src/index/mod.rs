//! Vector-index abstraction.
//!
//! The index is a black-box nearest-neighbor service: given a query
//! vector it returns top-K scored candidates with metadata, sorted
//! descending by score. Errors surface as `AppError::Retrieval`.

pub mod pinecone;

use crate::types::RetrievedMatch;
use colloquy_core::AppResult;

pub use pinecone::PineconeIndex;

/// Trait for nearest-neighbor index services.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query the index for the `top_k` nearest candidates.
    ///
    /// Returned matches are in the index's order (descending by score);
    /// callers must not assume any local re-sorting. Metadata is included
    /// when `include_metadata` is set.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> AppResult<Vec<RetrievedMatch>>;
}

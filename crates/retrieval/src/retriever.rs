//! Retrieval orchestration: embed a query, ask the index, filter by score.

use crate::embedding::EmbeddingClient;
use crate::index::VectorIndex;
use crate::types::RetrievedMatch;
use colloquy_core::AppResult;
use std::sync::Arc;

/// Retrieves scored candidate passages for a search query.
///
/// Candidates scoring strictly below `min_score` are discarded; the
/// survivors keep the index's returned order (assumed descending by
/// score — never re-sorted here). Index failures are logged and
/// re-raised: fatal to the turn, not retried.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    /// Create a retriever over an embedder and an index.
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        min_score: f32,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            min_score,
        }
    }

    /// Retrieve and filter candidates for an (already enhanced) query.
    pub async fn retrieve(&self, query: &str) -> AppResult<Vec<RetrievedMatch>> {
        tracing::info!("Retrieving candidates for query ({} bytes)", query.len());

        let vector = self.embed_query(query).await?;
        self.fetch_candidates(&vector).await
    }

    /// Encode a query into the index's vector space.
    pub async fn embed_query(&self, query: &str) -> AppResult<Vec<f32>> {
        self.embedder.encode(query).await.map_err(|e| {
            tracing::error!("Query embedding failed: {}", e);
            e
        })
    }

    /// Query the index with an already-encoded vector and apply the
    /// score filter.
    pub async fn fetch_candidates(&self, vector: &[f32]) -> AppResult<Vec<RetrievedMatch>> {
        let candidates = self
            .index
            .query(vector, self.top_k, true)
            .await
            .map_err(|e| {
                tracing::error!("Index query failed: {}", e);
                e
            })?;

        tracing::debug!("Index returned {} candidates before filtering", candidates.len());

        let filtered: Vec<RetrievedMatch> = candidates
            .into_iter()
            .filter(|m| m.score >= self.min_score)
            .collect();

        if filtered.is_empty() {
            tracing::info!(
                "No relevant candidates (all scores below {:.2} threshold)",
                self.min_score
            );
        } else {
            tracing::info!(
                "Kept {} candidates (top score: {:.3})",
                filtered.len(),
                filtered.first().map(|m| m.score).unwrap_or(0.0)
            );
        }

        Ok(filtered)
    }
}

//! Local deterministic embedder.
//!
//! Hashes character trigrams into a fixed-length vector. Not a semantic
//! model; exists so the pipeline can run end-to-end in tests and offline
//! development without an embedding service. Deterministic for identical
//! input, matching the embedding-service contract.

use crate::embedding::EmbeddingClient;
use colloquy_core::AppResult;

/// FNV-1a 64-bit hash.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Deterministic trigram-hash embedder.
#[derive(Debug, Clone)]
pub struct TrigramEmbedder {
    dimensions: usize,
}

impl TrigramEmbedder {
    /// Create an embedder producing vectors of the given length.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        for word in lower.split_whitespace().filter(|w| w.len() > 2) {
            // Whole-word signal
            let slot = (fnv1a(word.as_bytes()) as usize) % self.dimensions;
            vector[slot] += 1.0;

            // Trigram signal over the word's characters
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let slot = (fnv1a(trigram.as_bytes()) as usize) % self.dimensions;
                vector[slot] += 0.5;
            }
        }

        // Unit-normalize so cosine similarity behaves
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingClient for TrigramEmbedder {
    fn provider_name(&self) -> &str {
        "local"
    }

    fn model_name(&self) -> &str {
        "trigram"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn encode(&self, text: &str) -> AppResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_vector_length_and_normalization() {
        let embedder = TrigramEmbedder::new(384);
        let vector = embedder.encode("how do pipelines work").await.unwrap();

        assert_eq!(vector.len(), 384);
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic_for_identical_input() {
        let embedder = TrigramEmbedder::new(128);
        let a = embedder.encode("merge request approvals").await.unwrap();
        let b = embedder.encode("merge request approvals").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let embedder = TrigramEmbedder::new(128);
        let a = embedder.encode("continuous integration").await.unwrap();
        let b = embedder.encode("security scanning").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = TrigramEmbedder::new(64);
        let vector = embedder.encode("").await.unwrap();
        assert!(vector.iter().all(|&x| x == 0.0));
    }
}

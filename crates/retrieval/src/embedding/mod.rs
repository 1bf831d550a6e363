//! Embedding-service abstraction.
//!
//! Converts text into fixed-length numeric vectors. The model itself is
//! a black box; implementations only wrap its transport.

pub mod local;
pub mod ollama;

use colloquy_core::{config::EmbeddingSettings, AppError, AppResult};
use std::sync::Arc;

pub use local::TrigramEmbedder;
pub use ollama::OllamaEmbedder;

/// Trait for embedding providers.
///
/// Implementations must be deterministic for identical input and safe
/// for concurrent use by independent callers.
#[async_trait::async_trait]
pub trait EmbeddingClient: Send + Sync + std::fmt::Debug {
    /// Provider name (e.g., "ollama", "local")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Vector dimensions
    fn dimensions(&self) -> usize;

    /// Convert text into a fixed-length vector.
    async fn encode(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Create an embedding client from configuration.
pub fn create_embedder(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingClient>> {
    match settings.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            settings.endpoint.as_deref(),
            &settings.model,
            settings.dimensions,
        ))),

        "local" => Ok(Arc::new(TrigramEmbedder::new(settings.dimensions))),

        other => Err(AppError::Retrieval(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, local",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_core::config::EmbeddingSettings;

    #[test]
    fn test_create_local_embedder() {
        let settings = EmbeddingSettings {
            provider: "local".to_string(),
            model: "trigram".to_string(),
            dimensions: 384,
            endpoint: None,
        };

        let embedder = create_embedder(&settings).unwrap();
        assert_eq!(embedder.provider_name(), "local");
        assert_eq!(embedder.dimensions(), 384);
    }

    #[test]
    fn test_create_unknown_embedder() {
        let settings = EmbeddingSettings {
            provider: "unknown".to_string(),
            model: "x".to_string(),
            dimensions: 384,
            endpoint: None,
        };

        let result = create_embedder(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }
}

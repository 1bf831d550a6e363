//! Pinecone-style vector index client.
//!
//! Speaks the Pinecone query protocol: POST `/query` with the query
//! vector, `topK`, and `includeMetadata`; the response carries scored
//! matches with `{title, url, text}` metadata.

use crate::index::VectorIndex;
use crate::types::{RetrievedMatch, SourceMetadata};
use colloquy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    text: String,
}

/// HTTP client for a Pinecone-style index.
pub struct PineconeIndex {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PineconeIndex {
    /// Create a client for the given index host.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> AppResult<Vec<RetrievedMatch>> {
        tracing::debug!(
            "Querying index at {} (top_k: {}, dims: {})",
            self.endpoint,
            top_k,
            vector.len()
        );

        let url = format!("{}/query", self.endpoint);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.header("Api-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Index query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Index API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse index response: {}", e)))?;

        let matches = parsed
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_default();
                RetrievedMatch {
                    score: m.score,
                    metadata: SourceMetadata {
                        title: metadata.title,
                        url: metadata.url,
                        text: metadata.text,
                    },
                }
            })
            .collect();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_wire_shape() {
        let vector = vec![0.1f32, 0.2, 0.3];
        let body = QueryRequest {
            vector: &vector,
            top_k: 3,
            include_metadata: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["vector"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_query_response_parsing() {
        let payload = r#"{
            "matches": [
                {"id": "a", "score": 0.91, "metadata": {"title": "CI", "url": "https://x/ci", "text": "body"}},
                {"id": "b", "score": 0.42, "metadata": {"title": "MR", "url": "https://x/mr", "text": "body2"}}
            ]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].score, 0.91);
        assert_eq!(parsed.matches[0].metadata.as_ref().unwrap().title, "CI");
    }

    #[test]
    fn test_query_response_missing_metadata() {
        let payload = r#"{"matches": [{"id": "a", "score": 0.5}]}"#;
        let parsed: QueryResponse = serde_json::from_str(payload).unwrap();
        assert!(parsed.matches[0].metadata.is_none());
    }
}

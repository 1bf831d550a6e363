//! Retrieval result types.

use serde::{Deserialize, Serialize};

/// Metadata carried by every indexed passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document title
    pub title: String,

    /// Canonical URL of the document
    pub url: String,

    /// Passage body text
    pub text: String,
}

/// One candidate passage returned by the vector index.
///
/// Immutable once produced. Ordering is the index's returned order,
/// assumed descending by score; the orchestration core never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedMatch {
    /// Relevance score (cosine similarity, higher = more relevant)
    pub score: f32,

    /// Passage metadata
    pub metadata: SourceMetadata,
}

impl RetrievedMatch {
    /// Construct a match, mainly useful in tests.
    pub fn new(score: f32, title: &str, url: &str, text: &str) -> Self {
        Self {
            score,
            metadata: SourceMetadata {
                title: title.to_string(),
                url: url.to_string(),
                text: text.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_serialization_round_trip() {
        let m = RetrievedMatch::new(0.82, "CI/CD", "https://docs.example/ci", "Pipelines run...");
        let json = serde_json::to_string(&m).unwrap();
        let back: RetrievedMatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}

//! Context assembly: turn filtered matches into the prompt's context block.

use colloquy_retrieval::RetrievedMatch;

/// Sentinel returned for an empty match set. This exact string doubles
/// as the control signal that skips answer generation upstream.
pub const NO_SOURCES_SENTINEL: &str = "No relevant sources found for this query.";

/// Formats retrieved matches into a bounded textual context block.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    max_chars: Option<usize>,
}

impl ContextAssembler {
    /// Create an assembler with an optional character cap on the
    /// assembled block. `None` preserves the historical unbounded
    /// behavior.
    pub fn new(max_chars: Option<usize>) -> Self {
        Self { max_chars }
    }

    /// Format matches in input order, or return the sentinel when there
    /// are none. No deduplication of repeated titles or URLs.
    pub fn format(&self, matches: &[RetrievedMatch]) -> String {
        if matches.is_empty() {
            return NO_SOURCES_SENTINEL.to_string();
        }

        let mut context = String::new();
        for m in matches {
            context.push_str(&format!(
                "Title: {}\nURL: {}\nText: {}\n\n",
                m.metadata.title, m.metadata.url, m.metadata.text
            ));
        }

        // The cap applies to assembled context only, never the sentinel
        if let Some(max) = self.max_chars {
            if context.chars().count() > max {
                tracing::warn!(
                    "Assembled context exceeds {} chars, truncating",
                    max
                );
                context = context.chars().take(max).collect();
            }
        }

        context
    }
}

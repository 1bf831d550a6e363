//! Configuration management for Colloquy.
//!
//! Configuration is merged from three sources, in increasing precedence:
//! - Built-in defaults
//! - A YAML config file (`colloquy.yaml` in the working directory, or
//!   the path given via `COLLOQUY_CONFIG` / `--config`)
//! - Environment variables and CLI flags
//!
//! Secrets (API keys) are never stored in the config file; the file names
//! the environment variable that holds each key.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default number of nearest-neighbor candidates requested per query.
pub const DEFAULT_TOP_K: u32 = 3;

/// Default similarity cutoff: candidates scoring strictly below this
/// value are discarded before prompt assembly.
pub const DEFAULT_MIN_SCORE: f32 = 0.30;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion-service provider (e.g., "openai", "ollama")
    pub provider: String,

    /// Completion model identifier
    pub model: String,

    /// API key for the completion provider
    pub api_key: Option<String>,

    /// Display language name (e.g., "English", "French"). Parsed into
    /// the closed `Language` enumeration at startup; unknown names fail
    /// fast before any turn runs.
    pub language: String,

    /// Optional cap (in characters) on the assembled retrieval context.
    /// `None` means unlimited.
    pub max_context_chars: Option<usize>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Embedding-service settings
    pub embedding: EmbeddingSettings,

    /// Vector-index settings
    pub index: IndexSettings,

    /// Translation-service settings
    pub translation: TranslationSettings,
}

/// Embedding-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider name ("ollama" or "local")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Expected vector dimensions
    pub dimensions: usize,

    /// Optional custom endpoint URL
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            endpoint: None,
        }
    }
}

/// Vector-index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Index query endpoint (host URL)
    pub endpoint: String,

    /// Environment variable holding the index API key
    pub api_key_env: String,

    /// Number of nearest neighbors to request
    pub top_k: u32,

    /// Similarity cutoff applied to returned candidates
    pub min_score: f32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6333".to_string(),
            api_key_env: "INDEX_API_KEY".to_string(),
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Translation-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// Environment variable holding the translation API key
    pub api_key_env: String,

    /// Translation endpoint (host URL)
    pub endpoint: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            api_key_env: "DEEPL_API_KEY".to_string(),
            endpoint: "https://api-free.deepl.com".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    chat: Option<ChatFileSection>,
    embedding: Option<EmbeddingFileSection>,
    index: Option<IndexFileSection>,
    translation: Option<TranslationFileSection>,
    logging: Option<LoggingFileSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmFileSection {
    provider: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatFileSection {
    language: Option<String>,
    #[serde(rename = "maxContextChars")]
    max_context_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingFileSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexFileSection {
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<u32>,
    #[serde(rename = "minScore")]
    min_score: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranslationFileSection {
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingFileSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            language: "English".to_string(),
            max_context_chars: None,
            log_level: None,
            verbose: false,
            no_color: false,
            embedding: EmbeddingSettings::default(),
            index: IndexSettings::default(),
            translation: TranslationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the YAML config
    /// file, and defaults.
    ///
    /// Environment variables:
    /// - `COLLOQUY_CONFIG`: Path to config file
    /// - `COLLOQUY_PROVIDER`: Completion provider
    /// - `COLLOQUY_MODEL`: Model identifier
    /// - `COLLOQUY_API_KEY`: Completion API key
    /// - `COLLOQUY_LANGUAGE`: Display language name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an explicit config-file path taking
    /// precedence over `COLLOQUY_CONFIG` and the default location.
    ///
    /// The CLI resolves its `--config` flag before loading, so the flag
    /// decides which YAML file is merged.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.or_else(|| {
            std::env::var("COLLOQUY_CONFIG")
                .ok()
                .map(PathBuf::from)
        });

        // Load from YAML config file if present
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from("colloquy.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("COLLOQUY_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("COLLOQUY_MODEL") {
            config.model = model;
        }

        if let Ok(language) = std::env::var("COLLOQUY_LANGUAGE") {
            config.language = language;
        }

        config.api_key = std::env::var("COLLOQUY_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
        }

        if let Some(chat) = config_file.chat {
            if let Some(language) = chat.language {
                result.language = language;
            }
            if chat.max_context_chars.is_some() {
                result.max_context_chars = chat.max_context_chars;
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding.dimensions = dimensions;
            }
            if embedding.endpoint.is_some() {
                result.embedding.endpoint = embedding.endpoint;
            }
        }

        if let Some(index) = config_file.index {
            if let Some(endpoint) = index.endpoint {
                result.index.endpoint = endpoint;
            }
            if let Some(api_key_env) = index.api_key_env {
                result.index.api_key_env = api_key_env;
            }
            if let Some(top_k) = index.top_k {
                result.index.top_k = top_k;
            }
            if let Some(min_score) = index.min_score {
                result.index.min_score = min_score;
            }
        }

        if let Some(translation) = config_file.translation {
            if let Some(api_key_env) = translation.api_key_env {
                result.translation.api_key_env = api_key_env;
            }
            if let Some(endpoint) = translation.endpoint {
                result.translation.endpoint = endpoint;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        language: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(language) = language {
            self.language = language;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the completion API key.
    ///
    /// `COLLOQUY_API_KEY` wins; otherwise the provider's conventional
    /// environment variable is consulted.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.provider.as_str() {
            "openai" => std::env::var("OPENAI_API_KEY").ok(),
            _ => None,
        }
    }

    /// Resolve the vector-index API key from its configured environment
    /// variable.
    pub fn resolve_index_api_key(&self) -> Option<String> {
        std::env::var(&self.index.api_key_env).ok()
    }

    /// Resolve the translation API key from its configured environment
    /// variable.
    pub fn resolve_translation_api_key(&self) -> Option<String> {
        std::env::var(&self.translation.api_key_env).ok()
    }

    /// Validate configuration for the active providers.
    ///
    /// The display language itself is validated separately when it is
    /// parsed into the closed `Language` enumeration at startup.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["openai", "ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        let known_embedders = ["ollama", "local"];
        if !known_embedders.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_embedders.join(", ")
            )));
        }

        if self.provider == "openai" && self.resolve_api_key().is_none() {
            return Err(AppError::Config(
                "OpenAI provider requires an API key (COLLOQUY_API_KEY or OPENAI_API_KEY)"
                    .to_string(),
            ));
        }

        if self.index.top_k == 0 {
            return Err(AppError::Config(
                "index.topK must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.language, "English");
        assert_eq!(config.index.top_k, 3);
        assert_eq!(config.index.min_score, 0.30);
        assert!(config.max_context_chars.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            Some("ollama".to_string()),
            Some("llama3".to_string()),
            Some("French".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3");
        assert_eq!(overridden.language, "French");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_load_from_explicit_path_wins() {
        let path = std::env::temp_dir().join("colloquy-load-from-test.yaml");
        std::fs::write(&path, "llm:\n  model: from-file\nchat:\n  language: French\n").unwrap();

        let config = AppConfig::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.model, "from-file");
        assert_eq!(config.language, "French");
        assert_eq!(config.config_file, Some(path.clone()));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = AppConfig::default();
        config.index.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama_needs_no_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }
}

//! DeepL translation client.

use super::TranslationService;
use colloquy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api-free.deepl.com";

/// HTTP client for the DeepL v2 translate endpoint.
#[derive(Debug, Clone)]
pub struct DeeplTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl DeeplTranslator {
    /// Create a client with an API key and an optional endpoint override.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl TranslationService for DeeplTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> AppResult<String> {
        let url = format!("{}/v2/translate", self.base_url);
        let body = TranslateRequest {
            text: vec![text],
            target_lang: target_code,
        };

        tracing::debug!("DeepL request: target {}", target_code);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Translation(format!("DeepL request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Translation(format!(
                "DeepL API error ({}): {}",
                status, detail
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Translation(format!("Invalid DeepL response: {}", e)))?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| AppError::Translation("DeepL returned no translations".to_string()))
    }
}

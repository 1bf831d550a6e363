//! Display-language translation.
//!
//! The conversation is canonically stored and processed in the pivot
//! language (English); translation applies only at the user-facing
//! edges. Translation failures degrade gracefully: the original text is
//! used and a warning surfaces, but the turn never aborts.

pub mod deepl;

use crate::surface::Surface;
use colloquy_core::{AppError, AppResult};
use std::sync::Arc;

pub use deepl::DeeplTranslator;

/// Supported display languages, closed at compile time.
///
/// Unknown language names fail at configuration time, not mid-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
}

/// The language history and internal processing are stored in.
pub const PIVOT_LANGUAGE: Language = Language::English;

impl Language {
    /// Parse a display-language name. Fails fast on unknown names.
    pub fn parse(name: &str) -> AppResult<Self> {
        match name {
            "English" => Ok(Self::English),
            "French" => Ok(Self::French),
            other => Err(AppError::Config(format!(
                "Unknown display language: '{}'. Supported: English, French",
                other
            ))),
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
        }
    }

    /// Service-specific target code.
    pub fn service_code(&self) -> &'static str {
        match self {
            Self::English => "EN-US",
            Self::French => "FR",
        }
    }

    /// Whether this is the pivot language.
    pub fn is_pivot(&self) -> bool {
        *self == PIVOT_LANGUAGE
    }
}

/// Trait for the black-box translation service.
#[async_trait::async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate text to the given service-specific target code.
    async fn translate(&self, text: &str, target_code: &str) -> AppResult<String>;
}

/// No-op service for setups without a translation backend. Only valid
/// when the display language is the pivot, where every call
/// short-circuits before reaching the service anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait::async_trait]
impl TranslationService for PassthroughTranslator {
    async fn translate(&self, text: &str, _target_code: &str) -> AppResult<String> {
        Ok(text.to_string())
    }
}

/// Applies the optional translation pass at the pipeline's edges.
pub struct TranslationAdapter {
    service: Arc<dyn TranslationService>,
}

impl TranslationAdapter {
    /// Create an adapter over a translation service.
    pub fn new(service: Arc<dyn TranslationService>) -> Self {
        Self { service }
    }

    /// Translate outbound text into the display language.
    ///
    /// Short-circuits (no service call) for empty text or when the
    /// target is the pivot language. On failure the original text is
    /// returned and one warning is surfaced.
    pub async fn translate(
        &self,
        text: &str,
        target: Language,
        surface: &mut dyn Surface,
    ) -> String {
        if text.is_empty() || target.is_pivot() {
            return text.to_string();
        }

        self.call_service(text, target.service_code(), surface).await
    }

    /// Translate inbound user text into the pivot language.
    ///
    /// `selected` is the language the user is typing in; when it is
    /// already the pivot, the text passes through untouched.
    pub async fn to_pivot(
        &self,
        text: &str,
        selected: Language,
        surface: &mut dyn Surface,
    ) -> String {
        if text.is_empty() || selected.is_pivot() {
            return text.to_string();
        }

        self.call_service(text, PIVOT_LANGUAGE.service_code(), surface)
            .await
    }

    /// Translate every value in an ordered list of named text fields,
    /// returning a same-shaped list. Convenience wrapper for bulk UI
    /// string localization; failure policy is per-field `translate`.
    pub async fn translate_fields(
        &self,
        fields: &[(&str, &str)],
        target: Language,
        surface: &mut dyn Surface,
    ) -> Vec<(String, String)> {
        let mut translated = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let text = self.translate(value, target, surface).await;
            translated.push((key.to_string(), text));
        }
        translated
    }

    async fn call_service(&self, text: &str, code: &str, surface: &mut dyn Surface) -> String {
        match self.service.translate(text, code).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("Translation to {} failed: {}", code, e);
                surface.show_error(&format!("Translation error: {}", e));
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Translation fake: tags text with the target code, or fails.
    struct FakeService {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl TranslationService for FakeService {
        async fn translate(&self, text: &str, target_code: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::Translation("service down".to_string()))
            } else {
                Ok(format!("[{}] {}", target_code, text))
            }
        }
    }

    /// Surface fake recording errors.
    #[derive(Default)]
    struct RecordingSurface {
        errors: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn display_message(&mut self, _role: Role, _text: &str) {}

        fn read_user_input(&mut self) -> AppResult<Option<String>> {
            Ok(None)
        }

        fn selected_language(&self) -> Language {
            Language::English
        }

        fn show_error(&mut self, text: &str) {
            self.errors.push(text.to_string());
        }

        fn show_status(&mut self, _text: &str) {}
    }

    #[test]
    fn test_parse_known_and_unknown_languages() {
        assert_eq!(Language::parse("English").unwrap(), Language::English);
        assert_eq!(Language::parse("French").unwrap(), Language::French);
        assert!(Language::parse("Klingon").is_err());
    }

    #[tokio::test]
    async fn test_pivot_short_circuit_makes_no_service_call() {
        let service = Arc::new(FakeService::ok());
        let adapter = TranslationAdapter::new(service.clone());
        let mut surface = RecordingSurface::default();

        let result = adapter.translate("Hello", Language::English, &mut surface).await;
        assert_eq!(result, "Hello");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_text_short_circuit() {
        let service = Arc::new(FakeService::ok());
        let adapter = TranslationAdapter::new(service.clone());
        let mut surface = RecordingSurface::default();

        let result = adapter.translate("", Language::French, &mut surface).await;
        assert_eq!(result, "");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translation_to_display_language() {
        let adapter = TranslationAdapter::new(Arc::new(FakeService::ok()));
        let mut surface = RecordingSurface::default();

        let result = adapter.translate("Hello", Language::French, &mut surface).await;
        assert_eq!(result, "[FR] Hello");
        assert!(surface.errors.is_empty());
    }

    #[tokio::test]
    async fn test_failure_falls_back_with_one_warning() {
        let adapter = TranslationAdapter::new(Arc::new(FakeService::failing()));
        let mut surface = RecordingSurface::default();

        let result = adapter.translate("Hello", Language::French, &mut surface).await;
        assert_eq!(result, "Hello");
        assert_eq!(surface.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_to_pivot_targets_english() {
        let adapter = TranslationAdapter::new(Arc::new(FakeService::ok()));
        let mut surface = RecordingSurface::default();

        let result = adapter
            .to_pivot("Bonjour", Language::French, &mut surface)
            .await;
        assert_eq!(result, "[EN-US] Bonjour");

        let untouched = adapter
            .to_pivot("Hello", Language::English, &mut surface)
            .await;
        assert_eq!(untouched, "Hello");
    }

    #[tokio::test]
    async fn test_translate_fields_keeps_shape_and_order() {
        let adapter = TranslationAdapter::new(Arc::new(FakeService::ok()));
        let mut surface = RecordingSurface::default();

        let fields = [("title", "Chat"), ("subtitle", "Ask me anything")];
        let translated = adapter
            .translate_fields(&fields, Language::French, &mut surface)
            .await;

        assert_eq!(translated.len(), 2);
        assert_eq!(translated[0], ("title".to_string(), "[FR] Chat".to_string()));
        assert_eq!(
            translated[1],
            ("subtitle".to_string(), "[FR] Ask me anything".to_string())
        );
    }
}

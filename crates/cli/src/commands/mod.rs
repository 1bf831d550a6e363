//! Command handlers for the colloquy CLI.

pub mod ask;
pub mod chat;

pub use ask::AskCommand;
pub use chat::ChatCommand;

use colloquy_chat::{
    AnswerGenerator, ChatPipeline, ContextAssembler, DeeplTranslator, Language,
    PassthroughTranslator, QueryEnhancer, Session, TranslationAdapter, TranslationService,
};
use colloquy_core::{config::AppConfig, AppError, AppResult};
use colloquy_llm::create_client;
use colloquy_retrieval::{create_embedder, PineconeIndex, Retriever};
use std::sync::Arc;

/// Wire a fresh pipeline from configuration.
///
/// A non-pivot display language requires a translation API key; with the
/// pivot language the translator is never consulted, so a passthrough
/// stands in when no key is configured.
pub(crate) fn build_pipeline(config: &AppConfig) -> AppResult<ChatPipeline> {
    let client = create_client(
        &config.provider,
        None,
        config.resolve_api_key().as_deref(),
    )
    .map_err(AppError::Config)?;

    let embedder = create_embedder(&config.embedding)?;
    let index = Arc::new(PineconeIndex::new(
        config.index.endpoint.clone(),
        config.resolve_index_api_key(),
    ));
    let retriever = Retriever::new(
        embedder,
        index,
        config.index.top_k as usize,
        config.index.min_score,
    );

    let language = Language::parse(&config.language)?;
    let translator: Arc<dyn TranslationService> = match config.resolve_translation_api_key() {
        Some(key) => Arc::new(DeeplTranslator::new(
            key,
            Some(config.translation.endpoint.clone()),
        )),
        None if language.is_pivot() => Arc::new(PassthroughTranslator),
        None => {
            return Err(AppError::Config(format!(
                "Display language {} requires a translation API key ({})",
                language.name(),
                config.translation.api_key_env
            )));
        }
    };

    Ok(ChatPipeline::new(
        Session::new(),
        QueryEnhancer::new(client.clone(), &config.model),
        retriever,
        ContextAssembler::new(config.max_context_chars),
        AnswerGenerator::new(client, &config.model),
        TranslationAdapter::new(translator),
    ))
}

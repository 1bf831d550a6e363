//! Conversational question answering over a retrieval index.
//!
//! Wires query enhancement, retrieval, context assembly, answer
//! generation, and display-language translation into a per-session
//! turn pipeline.

pub mod assembler;
pub mod enhancer;
pub mod generator;
pub mod history;
pub mod pipeline;
pub mod session;
pub mod surface;
pub mod translate;

#[cfg(test)]
mod tests;

pub use assembler::{ContextAssembler, NO_SOURCES_SENTINEL};
pub use enhancer::QueryEnhancer;
pub use generator::AnswerGenerator;
pub use history::{ConversationHistory, Role, Turn, WELCOME_MESSAGE};
pub use pipeline::{ChatPipeline, TurnOutcome, TurnPhase, GENERATING_STATUS, SOURCES_HEADING};
pub use session::Session;
pub use surface::Surface;
pub use translate::{
    DeeplTranslator, Language, PassthroughTranslator, TranslationAdapter, TranslationService,
    PIVOT_LANGUAGE,
};

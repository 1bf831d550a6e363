//! Per-turn orchestration: enhancement, retrieval, assembly, generation,
//! and translation, run strictly in sequence.

use crate::assembler::{ContextAssembler, NO_SOURCES_SENTINEL};
use crate::enhancer::QueryEnhancer;
use crate::generator::AnswerGenerator;
use crate::history::Role;
use crate::session::Session;
use crate::surface::Surface;
use crate::translate::TranslationAdapter;
use colloquy_core::AppResult;
use colloquy_retrieval::{RetrievedMatch, Retriever};

/// Busy indicator shown while a turn runs (translated per display
/// language before showing).
pub const GENERATING_STATUS: &str = "Generating response...";

/// Heading printed above the source list for an answered turn.
pub const SOURCES_HEADING: &str = "Sources:";

/// Where a turn currently is in its fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    QueryEnhancing,
    Embedding,
    Retrieving,
    NoContext,
    ContextFound,
    Generating,
    Translating,
    Displayed,
}

impl TurnPhase {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::QueryEnhancing => "query_enhancing",
            Self::Embedding => "embedding",
            Self::Retrieving => "retrieving",
            Self::NoContext => "no_context",
            Self::ContextFound => "context_found",
            Self::Generating => "generating",
            Self::Translating => "translating",
            Self::Displayed => "displayed",
        }
    }
}

/// What one completed turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Answer text in the pivot language (the form stored in history).
    pub answer: String,
    /// Filtered matches behind the answer, empty on the no-context path.
    pub sources: Vec<RetrievedMatch>,
    /// False when the sentinel short-circuited generation.
    pub answered_from_context: bool,
}

/// Drives one session through its turns.
///
/// A turn runs its stages strictly in sequence; there is no parallelism
/// and no retrying inside the pipeline. Retrieval and generation
/// failures abort the turn (the session survives); translation failures
/// never abort anything.
pub struct ChatPipeline {
    session: Session,
    enhancer: QueryEnhancer,
    retriever: Retriever,
    assembler: ContextAssembler,
    generator: AnswerGenerator,
    translator: TranslationAdapter,
    phase: TurnPhase,
}

impl ChatPipeline {
    pub fn new(
        session: Session,
        enhancer: QueryEnhancer,
        retriever: Retriever,
        assembler: ContextAssembler,
        generator: AnswerGenerator,
        translator: TranslationAdapter,
    ) -> Self {
        Self {
            session,
            enhancer,
            retriever,
            assembler,
            generator,
            translator,
            phase: TurnPhase::Idle,
        }
    }

    /// The session this pipeline drives.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current turn phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        tracing::debug!(
            "Turn phase: {} -> {} (session: {})",
            self.phase.as_str(),
            phase.as_str(),
            self.session.id()
        );
        self.phase = phase;
    }

    /// Localize the fixed UI labels for a surface's language in one
    /// bulk pass. With the pivot language selected this is a no-op
    /// passthrough (no service calls); on translation failure each
    /// label falls back to its pivot text.
    pub async fn localized_labels(
        &self,
        surface: &mut dyn Surface,
    ) -> Vec<(String, String)> {
        let language = surface.selected_language();
        self.translator
            .translate_fields(
                &[
                    ("generating", GENERATING_STATUS),
                    ("sources", SOURCES_HEADING),
                ],
                language,
                surface,
            )
            .await
    }

    /// Render the session's history onto a surface, injecting the
    /// synthetic welcome turn first if the history is empty.
    ///
    /// Turns are stored in the pivot language and translated here, at
    /// display time only.
    pub async fn display_history(&mut self, surface: &mut dyn Surface) {
        if self.session.history.ensure_welcome() {
            tracing::info!("Injected welcome turn (session: {})", self.session.id());
        }

        let language = surface.selected_language();
        let turns: Vec<_> = self.session.history.turns().to_vec();
        for turn in turns {
            let text = self.translator.translate(&turn.text, language, surface).await;
            surface.display_message(turn.role, &text);
        }
    }

    /// Run one full turn for a user question.
    ///
    /// Errors from enhancement, embedding, retrieval, or generation
    /// propagate to the caller; nothing is appended to the history on
    /// those paths, so a failed turn leaves the session as it was.
    pub async fn run_turn(
        &mut self,
        question: &str,
        surface: &mut dyn Surface,
    ) -> AppResult<TurnOutcome> {
        let language = surface.selected_language();

        surface.display_message(Role::Human, question);
        let status = self
            .translator
            .translate(GENERATING_STATUS, language, surface)
            .await;
        surface.show_status(&status);

        // All processing and history bookkeeping happens in the pivot
        // language; the typed text is only what the user sees above.
        let processing_question = self
            .translator
            .to_pivot(question, language, surface)
            .await;

        self.set_phase(TurnPhase::QueryEnhancing);
        let search_query = self
            .enhancer
            .enhance(&processing_question, &self.session.history)
            .await?;

        self.set_phase(TurnPhase::Embedding);
        let vector = self.retriever.embed_query(&search_query).await?;

        self.set_phase(TurnPhase::Retrieving);
        let matches = self.retriever.fetch_candidates(&vector).await?;
        self.session
            .cache_matches(&processing_question, matches.clone());

        let context = self.assembler.format(&matches);

        if context == NO_SOURCES_SENTINEL {
            self.set_phase(TurnPhase::NoContext);

            // The sentinel is the displayed answer; generation is skipped
            // but the exchange still enters the history.
            self.session
                .history
                .append(Role::Human, processing_question.as_str());
            self.session.history.append(Role::Ai, NO_SOURCES_SENTINEL);

            self.set_phase(TurnPhase::Translating);
            let displayed = self
                .translator
                .translate(NO_SOURCES_SENTINEL, language, surface)
                .await;
            surface.display_message(Role::Ai, &displayed);

            self.set_phase(TurnPhase::Displayed);
            self.set_phase(TurnPhase::Idle);

            return Ok(TurnOutcome {
                answer: NO_SOURCES_SENTINEL.to_string(),
                sources: Vec::new(),
                answered_from_context: false,
            });
        }

        self.set_phase(TurnPhase::ContextFound);
        self.set_phase(TurnPhase::Generating);
        let answer = self
            .generator
            .answer(
                &context,
                &processing_question,
                &self.session.history,
                self.session.id(),
            )
            .await?;

        self.session
            .history
            .append(Role::Human, processing_question.as_str());
        self.session.history.append(Role::Ai, answer.as_str());

        self.set_phase(TurnPhase::Translating);
        let displayed = self.translator.translate(&answer, language, surface).await;
        surface.display_message(Role::Ai, &displayed);

        self.set_phase(TurnPhase::Displayed);
        self.set_phase(TurnPhase::Idle);

        let sources = self
            .session
            .cached_matches(&processing_question)
            .map(|m| m.to_vec())
            .unwrap_or_default();

        Ok(TurnOutcome {
            answer,
            sources,
            answered_from_context: true,
        })
    }
}

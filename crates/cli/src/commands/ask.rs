//! One-shot ask command.

use super::chat::{label_text, TerminalSurface};
use clap::Args;
use colloquy_chat::{Language, Role, Surface, SOURCES_HEADING};
use colloquy_core::{config::AppConfig, AppResult};

/// Ask a single question and exit
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let language = Language::parse(&config.language)?;
        let mut pipeline = super::build_pipeline(config)?;

        if self.json {
            let mut surface = QuietSurface::new(language);
            let outcome = pipeline.run_turn(&self.question, &mut surface).await?;

            // The displayed (possibly translated) answer is what the
            // surface last rendered; the outcome holds the pivot form
            let displayed = surface
                .last_ai_message
                .unwrap_or_else(|| outcome.answer.clone());

            let payload = serde_json::json!({
                "question": self.question,
                "answer": displayed,
                "answeredFromContext": outcome.answered_from_context,
                "sources": outcome
                    .sources
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "title": s.metadata.title,
                            "url": s.metadata.url,
                            "score": s.score,
                        })
                    })
                    .collect::<Vec<_>>(),
                "provider": config.provider,
                "model": config.model,
                "warnings": surface.warnings,
            });

            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            let mut surface = TerminalSurface::new(language);
            let labels = pipeline.localized_labels(&mut surface).await;
            let sources_heading = label_text(&labels, "sources", SOURCES_HEADING);

            let outcome = pipeline.run_turn(&self.question, &mut surface).await?;
            super::chat::print_sources(&outcome, &sources_heading);
        }

        Ok(())
    }
}

/// Surface that swallows rendering so the command can emit clean JSON.
struct QuietSurface {
    language: Language,
    last_ai_message: Option<String>,
    warnings: Vec<String>,
}

impl QuietSurface {
    fn new(language: Language) -> Self {
        Self {
            language,
            last_ai_message: None,
            warnings: Vec::new(),
        }
    }
}

impl Surface for QuietSurface {
    fn display_message(&mut self, role: Role, text: &str) {
        if role == Role::Ai {
            self.last_ai_message = Some(text.to_string());
        }
    }

    fn read_user_input(&mut self) -> AppResult<Option<String>> {
        Ok(None)
    }

    fn selected_language(&self) -> Language {
        self.language
    }

    fn show_error(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }

    fn show_status(&mut self, _text: &str) {}
}

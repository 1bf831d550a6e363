//! Interactive chat command.

use clap::Args;
use colloquy_chat::{Language, Role, Surface, TurnOutcome, SOURCES_HEADING};
use colloquy_core::{config::AppConfig, AppResult};
use std::io::{self, BufRead, Write};

/// Interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let language = Language::parse(&config.language)?;
        let mut pipeline = super::build_pipeline(config)?;
        let mut surface = TerminalSurface::new(language);

        tracing::info!("Chat session started (id: {})", pipeline.session().id());

        // UI labels are localized once per session
        let labels = pipeline.localized_labels(&mut surface).await;
        let sources_heading = label_text(&labels, "sources", SOURCES_HEADING);

        pipeline.display_history(&mut surface).await;

        loop {
            let input = match surface.read_user_input()? {
                Some(line) => line,
                None => break,
            };

            if input.is_empty() {
                continue;
            }
            if input == "exit" || input == "quit" {
                break;
            }

            // A failed turn is reported and the session continues
            match pipeline.run_turn(&input, &mut surface).await {
                Ok(outcome) => print_sources(&outcome, &sources_heading),
                Err(e) => {
                    tracing::error!("Turn failed: {}", e);
                    surface.show_error(&format!("Something went wrong: {}", e));
                }
            }
        }

        tracing::info!("Chat session ended (id: {})", pipeline.session().id());
        println!("Bye!");

        Ok(())
    }
}

pub(crate) fn print_sources(outcome: &TurnOutcome, heading: &str) {
    if outcome.sources.is_empty() {
        return;
    }

    println!("\n{}", heading);
    for source in &outcome.sources {
        println!("  - {} ({})", source.metadata.title, source.metadata.url);
    }
    println!();
}

/// Look up a localized label by key, falling back to the pivot text.
pub(crate) fn label_text(labels: &[(String, String)], key: &str, fallback: &str) -> String {
    labels
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, text)| text.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Line-oriented terminal rendering of the chat surface.
pub(crate) struct TerminalSurface {
    language: Language,
}

impl TerminalSurface {
    pub(crate) fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Surface for TerminalSurface {
    fn display_message(&mut self, role: Role, text: &str) {
        match role {
            Role::Human => println!("You: {}", text),
            Role::Ai => println!("Assistant: {}", text),
        }
    }

    fn read_user_input(&mut self) -> AppResult<Option<String>> {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes_read = io::stdin().lock().read_line(&mut line)?;
        if bytes_read == 0 {
            // EOF
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn selected_language(&self) -> Language {
        self.language
    }

    fn show_error(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    fn show_status(&mut self, text: &str) {
        println!("{}", text);
    }
}

//! Colloquy CLI
//!
//! Main entry point for the colloquy command-line tool: conversational
//! question answering over a retrieval index.

mod commands;

use clap::{Parser, Subcommand};
use colloquy_chat::Language;
use colloquy_core::{config::AppConfig, logging, AppResult};
use commands::{AskCommand, ChatCommand};
use std::path::PathBuf;

/// Colloquy - conversational question answering over your documents
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(about = "Conversational question answering over a retrieval index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "COLLOQUY_CONFIG")]
    config: Option<PathBuf>,

    /// Completion provider (openai, ollama)
    #[arg(short, long, global = true, env = "COLLOQUY_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "COLLOQUY_MODEL")]
    model: Option<String>,

    /// Display language (English, French)
    #[arg(short, long, global = true, env = "COLLOQUY_LANGUAGE")]
    language: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat session
    Chat(ChatCommand),

    /// Ask a single question and exit
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration; an explicit --config path decides which
    // YAML file is merged
    let config = AppConfig::load_from(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.provider,
        cli.model,
        cli.language,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Colloquy CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Language: {}", config.language);

    // Fail fast on bad provider/language settings, before any turn runs
    config.validate()?;
    Language::parse(&config.language)?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

//! Error types for the Colloquy chat front end.
//!
//! This module defines a unified error enum covering all error categories
//! in the application: configuration, I/O, completion-service, retrieval,
//! and translation errors.

use thiserror::Error;

/// Unified error type for Colloquy.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// Propagation policy (per turn): retrieval and completion errors abort
/// the turn and surface past the pipeline boundary; translation errors
/// are recovered inside the translation adapter and never abort a turn.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion-service (LLM) errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding and vector-index errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Translation-service errors
    #[error("Translation error: {0}")]
    Translation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

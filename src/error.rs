//! Error types for the collection core.

use thiserror::Error;

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the collection core.
///
/// Per-target command failures are not represented here; they are carried as
/// [`InvocationOutcome::Failed`](crate::command::InvocationOutcome) values so
/// a collection sweep can record them and continue. Everything in this enum
/// is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection-level failure (unreachable control plane, bad credentials)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid collector configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redaction could not be applied safely
    #[error("Redaction error: {0}")]
    Redaction(String),

    /// Invalid redaction pattern
    #[error("Invalid redaction pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

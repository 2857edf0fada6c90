//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Coverage library error
    #[error("{0}")]
    Coverage(#[from] cubrir::CubrirError),

    /// Output serialization error
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

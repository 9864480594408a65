//! Error types for label resolution and publishing.

use thiserror::Error;

/// Errors that can abort an action run.
///
/// An empty label result is never an error; only unexpected failures end up
/// here and are surfaced to the host as a failed run.
#[derive(Debug, Error)]
pub enum LabelsError {
    /// A required action input was missing or blank
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// An action input could not be parsed
    #[error("Invalid value for input {name}: {message}")]
    InvalidInput { name: String, message: String },

    /// `GITHUB_REPOSITORY` was not in `owner/repo` form
    #[error("Invalid repository '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a file command or workflow command failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file command name or value collided with its heredoc delimiter
    #[error("Unexpected input: {kind} should not contain the delimiter \"{delimiter}\"")]
    DelimiterCollision {
        kind: &'static str,
        delimiter: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = LabelsError> = std::result::Result<T, E>;

//! Error types for the command client.

use thiserror::Error;

/// Errors that can occur while fetching JSON or dispatching a command.
#[derive(Error, Debug)]
pub enum CommandClientError {
    /// Transport-level failure (connection refused, DNS, body read, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing command endpoint URL
    #[error("Missing command endpoint URL (COMMAND_ENDPOINT_URL not set)")]
    MissingCommandUrl,
}

/// Result type alias using CommandClientError.
pub type CommandClientResult<T> = Result<T, CommandClientError>;

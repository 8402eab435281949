//! HTTP client for JSON fetches and command dispatch.
//!
//! This module provides a client that performs plain JSON GET requests and
//! POSTs opaque command strings to a configured backend endpoint. Command
//! semantics are entirely server-side; the client only shuttles JSON.

use crate::error::{CommandClientError, CommandClientResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Environment variable holding the command endpoint URL.
pub const COMMAND_ENDPOINT_URL_VAR: &str = "COMMAND_ENDPOINT_URL";

/// Client for JSON fetches and command dispatch.
#[derive(Clone, Debug)]
pub struct CommandClient {
    http_client: reqwest::Client,
    command_url: String,
}

/// Request body for a command dispatch.
#[derive(Debug, Serialize)]
struct CommandRequest {
    command: String,
}

/// Response envelope for a command dispatch.
///
/// The server is expected to reply with an object carrying a `data` field;
/// the field is not validated beyond being JSON, and may be absent. An
/// absent field decodes to `None`, an explicit null to `Some(Value::Null)`.
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default, deserialize_with = "deserialize_present_value")]
    data: Option<Value>,
}

/// Deserialize a field that is present in the input, keeping JSON null as
/// `Some(Value::Null)`. Plain `Option<Value>` would fold null into `None`,
/// erasing the null-vs-absent distinction the envelope needs.
fn deserialize_present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CommandClient {
    /// Create a new client with an explicit command endpoint URL.
    ///
    /// # Arguments
    /// * `command_url` - The URL commands are POSTed to
    pub fn new(command_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            command_url: command_url.into(),
        }
    }

    /// Create a new client from the COMMAND_ENDPOINT_URL environment variable.
    ///
    /// # Errors
    /// Returns `CommandClientError::MissingCommandUrl` if the variable is not set.
    pub fn from_env() -> CommandClientResult<Self> {
        let command_url = std::env::var(COMMAND_ENDPOINT_URL_VAR)
            .map_err(|_| CommandClientError::MissingCommandUrl)?;
        Ok(Self::new(command_url))
    }

    /// The command endpoint URL this client dispatches to.
    pub fn command_url(&self) -> &str {
        &self.command_url
    }

    /// GET a URL and decode the response body as JSON.
    ///
    /// The HTTP status is not validated: a non-2xx response whose body is
    /// still valid JSON is decoded and returned like any other. A body that
    /// fails to decode returns `CommandClientError::Json`.
    pub async fn fetch_json(&self, url: &str) -> CommandClientResult<Value> {
        tracing::debug!(url = %url, "Fetching JSON");

        let response = self
            .http_client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;

        tracing::debug!(url = %url, status, "Fetched JSON");

        Ok(value)
    }

    /// POST a command string to the command endpoint and return the `data`
    /// field of the JSON response.
    ///
    /// The request body is `{"command": <command>}`. Returns `None` when the
    /// response object has no `data` field; `Some(Value::Null)` when the field
    /// is present and null. Status handling matches [`fetch_json`](Self::fetch_json).
    pub async fn send_command(&self, command: &str) -> CommandClientResult<Option<Value>> {
        let request = CommandRequest {
            command: command.to_string(),
        };

        tracing::debug!(
            command_preview = %truncate_command(command, 100),
            "Dispatching command"
        );

        let response = self
            .http_client
            .post(&self.command_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let envelope: CommandResponse = serde_json::from_str(&body)?;

        tracing::debug!(status, has_data = envelope.data.is_some(), "Command dispatched");

        Ok(envelope.data)
    }
}

/// Truncate a command string for logging purposes.
///
/// Cuts on a char boundary at or below `max_len` bytes, so multibyte
/// commands never split mid-character.
pub(crate) fn truncate_command(command: &str, max_len: usize) -> String {
    if command.len() <= max_len {
        command.to_string()
    } else {
        let boundary = command
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= max_len)
            .last()
            .unwrap_or(0);
        format!("{}...", &command[..boundary])
    }
}

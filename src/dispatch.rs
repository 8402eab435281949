//! Fire-and-forget command dispatch helpers.
//!
//! Callers that do not want to await a command inline can either bridge the
//! result into a callback or detach the whole round trip onto a background
//! task and keep the `JoinHandle`.

use crate::client::{truncate_command, CommandClient};
use crate::error::CommandClientResult;
use serde_json::Value;

/// Dispatch a command and execute a callback with the extracted payload.
///
/// The callback is invoked exactly once, after the response arrives and
/// decodes successfully. Transport and decode failures are returned to the
/// caller without invoking the callback.
///
/// # Arguments
/// * `client` - The client to dispatch through
/// * `command` - The command string to send
/// * `on_data` - Callback to execute with the extracted `data` payload
pub async fn dispatch_command_with_callback<F>(
    client: &CommandClient,
    command: &str,
    on_data: F,
) -> CommandClientResult<Option<Value>>
where
    F: FnOnce(Option<&Value>),
{
    let data = client.send_command(command).await?;
    on_data(data.as_ref());
    Ok(data)
}

/// Spawn a background task to dispatch a command.
///
/// The task builds its own client, so the caller does not need to keep one
/// alive across the round trip.
///
/// # Arguments
/// * `command_url` - The command endpoint URL
/// * `command` - The command string to send
///
/// # Returns
/// A JoinHandle resolving to the extracted `data` payload.
pub fn spawn_command_dispatch(
    command_url: String,
    command: String,
) -> tokio::task::JoinHandle<CommandClientResult<Option<Value>>> {
    tracing::debug!(
        command_preview = %truncate_command(&command, 100),
        "Spawning command dispatch"
    );
    tokio::spawn(async move {
        let client = CommandClient::new(command_url);
        client.send_command(&command).await
    })
}

/// Spawn a background task to dispatch a command using the
/// COMMAND_ENDPOINT_URL environment variable.
///
/// # Arguments
/// * `command` - The command string to send
///
/// # Returns
/// A JoinHandle resolving to the extracted `data` payload.
pub fn spawn_command_dispatch_from_env(
    command: String,
) -> tokio::task::JoinHandle<CommandClientResult<Option<Value>>> {
    tokio::spawn(async move {
        let client = CommandClient::from_env()?;
        client.send_command(&command).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::COMMAND_ENDPOINT_URL_VAR;
    use crate::error::CommandClientError;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_command_endpoint(server: &MockServer, command: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path("/command"))
            .and(body_json(serde_json::json!({"command": command})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": data})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_callback_receives_payload_once() {
        let server = MockServer::start().await;
        mount_command_endpoint(&server, "ping", serde_json::json!({"ok": true})).await;

        let client = CommandClient::new(format!("{}/command", server.uri()));
        let mut calls = 0;
        let data = dispatch_command_with_callback(&client, "ping", |payload| {
            calls += 1;
            assert_eq!(payload, Some(&serde_json::json!({"ok": true})));
        })
        .await
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(data, Some(serde_json::json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_callback_not_invoked_on_transport_failure() {
        let client = CommandClient::new("http://127.0.0.1:9/command");
        let mut calls = 0;
        let result = dispatch_command_with_callback(&client, "ping", |_| {
            calls += 1;
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_spawned_dispatch_resolves_payload() {
        let server = MockServer::start().await;
        mount_command_endpoint(&server, "status", serde_json::json!("running")).await;

        let handle =
            spawn_command_dispatch(format!("{}/command", server.uri()), "status".to_string());
        let data = handle.await.unwrap().unwrap();

        assert_eq!(data, Some(serde_json::json!("running")));
    }

    #[tokio::test]
    async fn test_spawned_dispatch_from_env_resolves_payload() {
        let server = MockServer::start().await;
        mount_command_endpoint(&server, "status", serde_json::json!("running")).await;

        // Point the env var at the mock server for the duration of the test
        let original = std::env::var(COMMAND_ENDPOINT_URL_VAR).ok();
        std::env::set_var(COMMAND_ENDPOINT_URL_VAR, format!("{}/command", server.uri()));

        let handle = spawn_command_dispatch_from_env("status".to_string());
        let data = handle.await.unwrap().unwrap();

        // Restore the original value or remove the test value
        match original {
            Some(url) => std::env::set_var(COMMAND_ENDPOINT_URL_VAR, url),
            None => std::env::remove_var(COMMAND_ENDPOINT_URL_VAR),
        }

        assert_eq!(data, Some(serde_json::json!("running")));
    }

    #[tokio::test]
    async fn test_spawned_dispatch_from_env_missing_url() {
        // Temporarily remove the env var if it exists
        let original = std::env::var(COMMAND_ENDPOINT_URL_VAR).ok();
        std::env::remove_var(COMMAND_ENDPOINT_URL_VAR);

        let handle = spawn_command_dispatch_from_env("status".to_string());
        let result = handle.await.unwrap();

        // Restore the original value if it existed
        if let Some(url) = original {
            std::env::set_var(COMMAND_ENDPOINT_URL_VAR, url);
        }

        assert!(matches!(
            result.unwrap_err(),
            CommandClientError::MissingCommandUrl
        ));
    }

    #[tokio::test]
    async fn test_spawned_dispatch_does_not_block_caller() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/command"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": "slow"}))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let handle = spawn_command_dispatch(format!("{}/command", server.uri()), "slow".to_string());
        assert!(started.elapsed() < std::time::Duration::from_millis(100));

        let data = handle.await.unwrap().unwrap();
        assert_eq!(data, Some(serde_json::json!("slow")));
    }
}

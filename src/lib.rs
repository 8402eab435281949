//! Command Client - JSON fetch and command dispatch over HTTP.
//!
//! This crate provides a small client for backends that accept opaque command
//! strings on a single POST endpoint and serve JSON everywhere else. Command
//! responses are expected to wrap their payload in a `data` field; the payload
//! shape is consumer-defined and not validated here.
//!
//! # Usage
//!
//! ```ignore
//! use command_client::CommandClient;
//!
//! // Create a client with an explicit command endpoint
//! let client = CommandClient::new("https://backend.example/api/command");
//!
//! // Plain JSON GET
//! let status = client.fetch_json("https://backend.example/api/status").await?;
//!
//! // Command dispatch; yields the `data` field of the response
//! let data = client.send_command("restart").await?;
//! ```
//!
//! # Background dispatch
//!
//! For fire-and-forget use, the spawn helpers detach the round trip:
//!
//! ```ignore
//! use command_client::spawn_command_dispatch;
//!
//! let handle = spawn_command_dispatch(
//!     "https://backend.example/api/command".to_string(),
//!     "restart".to_string(),
//! );
//!
//! // Continue with other work...
//!
//! // Later, get the result
//! let data = handle.await??;
//! ```

mod client;
mod dispatch;
mod error;

pub use client::{CommandClient, COMMAND_ENDPOINT_URL_VAR};
pub use dispatch::{
    dispatch_command_with_callback, spawn_command_dispatch, spawn_command_dispatch_from_env,
};
pub use error::{CommandClientError, CommandClientResult};

//! Trait abstracting the NZBGet wire operations.
//!
//! This module provides the [`Transport`] trait which abstracts the underlying HTTP client,
//! enabling test doubles that record calls and return scripted envelopes.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failures below the protocol level, tagged with the stage that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad parameters).
    #[error("invalid request: {0}")]
    Request(String),

    /// Connection or transfer failure.
    #[error("{0}")]
    Network(String),

    /// The deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server answered 401.
    #[error("unauthorized")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The response body is not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Local I/O failure while storing a fetched file.
    #[error("io: {0}")]
    Io(String),
}

/// Error member of a response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RpcError {
    /// Error class, e.g. `JSONRPCError`.
    #[serde(default)]
    pub name: String,
    /// Error code.
    #[serde(default)]
    pub code: i64,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
}

/// Decoded JSON-RPC response.
///
/// `result` is left untyped here; each operation decodes it into its own shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Request id echoed by the server.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method-specific result.
    #[serde(default)]
    pub result: Value,
    /// Set when the call failed on the server.
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl Envelope {
    /// Returns an envelope carrying `result` and no error.
    pub fn with_result(result: Value) -> Self {
        Self {
            result,
            ..Default::default()
        }
    }

    /// Returns an envelope carrying `error`.
    pub fn with_error(code: i64, message: impl Into<String>) -> Self {
        Self {
            error: Some(RpcError {
                name: "JSONRPCError".to_string(),
                code,
                message: message.into(),
            }),
            ..Default::default()
        }
    }
}

/// The wire operations the client is built on.
///
/// Implementations make exactly one attempt per call; retries are the caller's business.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Invoke `method` with positional `params` and return the decoded envelope.
    ///
    /// An envelope carrying an error is still `Ok`: only failures below the protocol level are
    /// reported as [`TransportError`].
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Envelope, TransportError>;

    /// Issue a GET against `{endpoint}/{path}` with `query` as the query string and return the
    /// raw body.
    async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<u8>, TransportError>;

    /// Download `url` into the file at `dest`, returning the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError>;
}

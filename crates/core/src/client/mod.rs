//! HTTP seam between the fetchers and the remote driver API.
//!
//! The fetchers only need "perform a GET, hand back the status and body",
//! so that is all the `ApiClient` trait exposes. `HttpApiClient` is the
//! reqwest-backed implementation; tests use `testing::MockApiClient`.

mod http;

pub use http::HttpApiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Raw response from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (may be empty or malformed).
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Failures below the HTTP layer: no status code was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the server.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other request failure (body read, TLS, redirect loop, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Minimal GET-only client for the driver API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Perform a GET on `path` (relative to the configured base URL) with
    /// the given query parameters.
    async fn get(&self, path: &str, query: &[(&str, &str)])
        -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_is_ok_only_for_200() {
        assert!(ApiResponse::new(200, "{}").is_ok());
        assert!(!ApiResponse::new(201, "{}").is_ok());
        assert!(!ApiResponse::new(500, "").is_ok());
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Connect("refused".to_string()).to_string(),
            "connection failed: refused"
        );
    }
}

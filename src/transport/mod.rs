//! Transport seam between the client and the forum backend.
//!
//! DESIGN
//! ======
//! Everything above this module talks to the backend through the
//! [`Transport`] trait, so the session store and post fetchers can be driven
//! by scripted transports in tests. [`http::HttpTransport`] is the real
//! implementation.
//!
//! ERROR HANDLING
//! ==============
//! A non-2xx response is an error, not a `Response`. The parsed error body is
//! kept on [`TransportError::Status`] so callers can surface the backend's
//! `{ "error": "..." }` message.

pub mod http;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A settled 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Parsed JSON body. `Value::Null` for an empty body.
    pub body: Value,
}

/// Errors produced by a [`Transport`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not settle within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.
    #[error("server returned status {status}")]
    Status { status: u16, body: Option<Value> },
}

impl TransportError {
    /// Human-readable message from a structured error body (`{ "error": "..." }`).
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { body: Some(body), .. } => body
                .get("error")
                .and_then(Value::as_str)
                .filter(|msg| !msg.trim().is_empty()),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Generic request client. Enables scripted backends in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method path` with an optional body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, timeout, or a
    /// non-2xx status.
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, TransportError> {
        (**self).request(method, path, body).await
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

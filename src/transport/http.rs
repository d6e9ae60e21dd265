//! `reqwest`-backed [`Transport`].
//!
//! The forum backend keeps its session in a cookie, so the client is built
//! with a cookie store and must be reused for the lifetime of a session.
//! Pure helpers (`join_url`, `decode_body`) are split out for testability.

use serde_json::Value;

use super::{Method, Response, Transport, TransportError};
use crate::config::{BodyEncoding, ClientConfig};

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    encoding: BodyEncoding,
}

impl HttpTransport {
    /// Build a transport from typed client config.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| TransportError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: config.base_url.clone(), encoding: config.body_encoding })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, TransportError> {
        let url = join_url(&self.base_url, path);
        let mut builder = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if let Some(body) = body {
            builder = match self.encoding {
                BodyEncoding::Form => builder.form(body),
                BodyEncoding::Json => builder.json(body),
            };
        }

        tracing::debug!(%method, %url, "sending request");
        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(classify)?;
        let body = decode_body(&text);

        if !(200..300).contains(&status) {
            tracing::debug!(%method, %url, status, "request rejected");
            let body = if body.is_null() { None } else { Some(body) };
            return Err(TransportError::Status { status, body });
        }

        Ok(Response { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

/// Empty bodies become `null`; non-JSON text is kept as a JSON string.
pub(crate) fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

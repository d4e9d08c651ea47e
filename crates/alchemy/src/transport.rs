//! HTTP seam and request/response shapes.
//!
//! The library never talks to the network itself. Applications hand a
//! `HttpTransport` implementation to the `Client`; every model operation is a
//! single call through it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::Record;

/// Per-request options forwarded verbatim to the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Query-string parameters.
    #[serde(default)]
    pub params: Record,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// A completed HTTP exchange. `data` is the decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub data: Value,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self { status: 200, data }
    }
}

/// Failure reported by a transport. The library does not inspect it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
    pub data: Option<Value>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            data: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, opts: &RequestOptions) -> Result<Response, TransportError>;

    async fn post(
        &self,
        url: &str,
        data: &Value,
        opts: &RequestOptions,
    ) -> Result<Response, TransportError>;

    async fn put(
        &self,
        url: &str,
        data: &Value,
        opts: &RequestOptions,
    ) -> Result<Response, TransportError>;

    async fn delete(&self, url: &str, opts: &RequestOptions) -> Result<Response, TransportError>;
}

/// HTTP verbs used by model operations (for logging and test assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_builders_fill_params_and_headers() {
        let o = RequestOptions::default()
            .with_param("page", 2)
            .with_header("Accept", "application/json");
        assert_eq!(o.params.get("page"), Some(&json!(2)));
        assert_eq!(o.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn transport_error_displays_its_message() {
        let e = TransportError::new("boom").with_status(503);
        assert_eq!(e.to_string(), "boom");
        assert_eq!(e.status, Some(503));
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The transport trait consumed by the engine.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::headers::ResponseHeaders;

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Body bytes (empty for 204 and bodiless responses).
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: ResponseHeaders::new(),
            body: body.into(),
        }
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 202 Accepted.
    pub fn is_accepted(&self) -> bool {
        self.status == 202
    }

    /// Whether the body carries any non-whitespace content.
    pub fn has_body(&self) -> bool {
        self.body.iter().any(|b| !b.is_ascii_whitespace())
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP verbs needed by the engine.
///
/// Implementations must be safe for concurrent use: a single transport is
/// shared by every resource fetched through a client. URIs are the values
/// found in `@odata.id`, usually service-relative paths.
///
/// Dropping a returned future must abort the request; the engine relies on
/// this for cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET the URI.
    async fn get(&self, uri: &str) -> Result<HttpResponse>;

    /// POST a JSON body to the URI.
    async fn post(&self, uri: &str, body: Bytes) -> Result<HttpResponse>;

    /// PATCH a JSON body, with an `If-Match` precondition when given.
    async fn patch(&self, uri: &str, body: Bytes, if_match: Option<&str>) -> Result<HttpResponse>;

    /// DELETE the URI.
    async fn delete(&self, uri: &str) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        assert!(HttpResponse::new(200, "{}").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(HttpResponse::new(202, "").is_accepted());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
    }

    #[test]
    fn test_has_body() {
        assert!(!HttpResponse::new(204, "").has_body());
        assert!(!HttpResponse::new(200, " \r\n").has_body());
        assert!(HttpResponse::new(200, "{}").has_body());
    }

    #[test]
    fn test_json_decode() {
        let response = HttpResponse::new(200, r#"{"PowerState":"On"}"#).with_header("ETag", "\"1\"");
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["PowerState"], "On");
        assert_eq!(response.headers.etag(), Some("\"1\""));
    }
}

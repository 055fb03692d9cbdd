// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Native transport backed by reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, instrument};

use crate::config::{Credentials, TransportConfig};
use crate::error::{Result, TransportError};
use crate::headers::ResponseHeaders;
use crate::transport::{HttpResponse, Transport};

const JSON: &str = "application/json";

/// [`Transport`] implementation over a pooled reqwest client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
}

impl ReqwestTransport {
    /// Build a transport from configuration.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(TransportError::Config(format!(
                "endpoint must be an http(s) URL: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(config.skip_cert_verification)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            credentials: config.credentials,
        })
    }

    /// Build a transport from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(TransportConfig::from_env()?)
    }

    /// Base endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve an `@odata.id` style URI against the endpoint.
    ///
    /// Absolute URLs are used unchanged.
    pub fn resolve(&self, uri: &str) -> Result<String> {
        if uri.is_empty() {
            return Err(TransportError::InvalidUri("empty uri".to_string()));
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(uri.to_string());
        }
        if uri.starts_with('/') {
            Ok(format!("{}{}", self.endpoint, uri))
        } else {
            Ok(format!("{}/{}", self.endpoint, uri))
        }
    }

    fn request(&self, method: Method, uri: &str) -> Result<RequestBuilder> {
        let url = self.resolve(uri)?;
        let builder = self.client.request(method, url).header(ACCEPT, JSON);
        Ok(match &self.credentials {
            Some(Credentials::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Credentials::SessionToken(token)) => builder.header("X-Auth-Token", token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<HttpResponse> {
        let response = builder.send().await?;
        let status = response.status().as_u16();

        let mut headers = ResponseHeaders::new();
        for (name, value) in response.headers() {
            // Non-UTF-8 header values are not part of the protocol surface.
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }

        let body = response.bytes().await?;
        debug!(status, body_len = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self), fields(method = "GET"))]
    async fn get(&self, uri: &str) -> Result<HttpResponse> {
        let builder = self.request(Method::GET, uri)?;
        self.send(builder).await
    }

    #[instrument(skip(self, body), fields(method = "POST", body_len = body.len()))]
    async fn post(&self, uri: &str, body: Bytes) -> Result<HttpResponse> {
        let builder = self
            .request(Method::POST, uri)?
            .header(CONTENT_TYPE, JSON)
            .body(body);
        self.send(builder).await
    }

    #[instrument(skip(self, body), fields(method = "PATCH", body_len = body.len()))]
    async fn patch(&self, uri: &str, body: Bytes, if_match: Option<&str>) -> Result<HttpResponse> {
        let mut builder = self
            .request(Method::PATCH, uri)?
            .header(CONTENT_TYPE, JSON)
            .body(body);
        if let Some(etag) = if_match {
            builder = builder.header(IF_MATCH, etag);
        }
        self.send(builder).await
    }

    #[instrument(skip(self), fields(method = "DELETE"))]
    async fn delete(&self, uri: &str) -> Result<HttpResponse> {
        let builder = self.request(Method::DELETE, uri)?;
        self.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(endpoint: &str) -> ReqwestTransport {
        ReqwestTransport::new(TransportConfig::new(endpoint)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = ReqwestTransport::new(TransportConfig::new("bmc.local"));
        assert!(matches!(result, Err(TransportError::Config(_))));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let t = transport("https://bmc.local/");
        assert_eq!(t.endpoint(), "https://bmc.local");
        assert_eq!(
            t.resolve("/redfish/v1/Systems/1").unwrap(),
            "https://bmc.local/redfish/v1/Systems/1"
        );
        assert_eq!(
            t.resolve("redfish/v1").unwrap(),
            "https://bmc.local/redfish/v1"
        );
        assert_eq!(
            t.resolve("https://other.local/redfish/v1").unwrap(),
            "https://other.local/redfish/v1"
        );
        assert!(matches!(t.resolve(""), Err(TransportError::InvalidUri(_))));
    }
}

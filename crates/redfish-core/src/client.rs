// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ApiClient: the shared handle every fetched resource carries.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use redfish_http::{HttpResponse, Transport};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{RedfishError, Result};

/// Transport, engine configuration and the ambient cancellation signal.
///
/// Cloning is cheap and clones share the transport. Every operation that
/// performs I/O through a client observes its cancellation token: once the
/// token fires, in-flight requests are dropped and `Cancelled` is returned.
/// Timeouts are layered on top by cancelling the token (or a parent of it).
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default configuration.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::with_config(Arc::new(transport), ClientConfig::default())
    }

    /// Create a client over a shared transport.
    pub fn with_config(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            cancel: CancellationToken::new(),
        }
    }

    /// A client sharing this transport whose operations observe `token`.
    ///
    /// The new client's signal is a child of `token`, so cancelling `token`
    /// (or any of its ancestors) cancels operations started through it.
    pub fn with_cancellation(&self, token: &CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            cancel: token.child_token(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The ambient cancellation signal.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// GET a URI. Non-2xx statuses become errors.
    #[instrument(skip(self))]
    pub async fn get(&self, uri: &str) -> Result<HttpResponse> {
        self.guarded(uri, self.transport.get(uri)).await
    }

    /// POST a JSON body. Non-2xx statuses become errors.
    #[instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(&self, uri: &str, body: &B) -> Result<HttpResponse> {
        let body = Bytes::from(serde_json::to_vec(body)?);
        self.guarded(uri, self.transport.post(uri, body)).await
    }

    /// PATCH a JSON body with an optional `If-Match` precondition.
    #[instrument(skip(self, body))]
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        uri: &str,
        body: &B,
        if_match: Option<&str>,
    ) -> Result<HttpResponse> {
        let body = Bytes::from(serde_json::to_vec(body)?);
        self.guarded(uri, self.transport.patch(uri, body, if_match))
            .await
    }

    /// DELETE a URI.
    #[instrument(skip(self))]
    pub async fn delete(&self, uri: &str) -> Result<HttpResponse> {
        self.guarded(uri, self.transport.delete(uri)).await
    }

    /// Sleep until `deadline` unless cancelled first.
    pub async fn sleep_until(&self, deadline: Instant) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RedfishError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => Ok(()),
        }
    }

    async fn guarded<F>(&self, uri: &str, request: F) -> Result<HttpResponse>
    where
        F: Future<Output = redfish_http::Result<HttpResponse>>,
    {
        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Request abandoned on cancellation");
                return Err(RedfishError::Cancelled);
            }
            result = request => result?,
        };

        if response.is_success() {
            Ok(response)
        } else {
            debug!(status = response.status, "Request failed");
            Err(RedfishError::from_response(uri, &response))
        }
    }
}

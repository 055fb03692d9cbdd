// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for redfish-http.

use thiserror::Error;

/// Result type using TransportError.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised below the protocol layer.
///
/// An HTTP response with a non-2xx status is NOT a transport error: it is
/// returned as a normal [`crate::HttpResponse`] and interpreted by the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The URI could not be resolved against the endpoint.
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    /// Connection to the service failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Request failed after the connection was established.
    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUri(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for redfish-core.

use redfish_http::{HttpResponse, TransportError};
use thiserror::Error;

use crate::message::{Message, decode_error_messages};

/// Result type using RedfishError.
pub type Result<T> = std::result::Result<T, RedfishError>;

/// Errors surfaced by the engine.
///
/// Errors are returned verbatim: the engine never retries. Variants built
/// from an HTTP status carry the service's registry messages, if any.
#[derive(Debug, Error)]
pub enum RedfishError {
    /// 401: credentials missing or expired.
    #[error("unauthorized: {uri}")]
    Unauthorized { uri: String, messages: Vec<Message> },

    /// 403: the principal may not perform the operation.
    #[error("forbidden: {uri}")]
    Forbidden { uri: String, messages: Vec<Message> },

    /// 404: the resource does not exist (or was deleted).
    #[error("resource not found: {uri}")]
    NotFound { uri: String, messages: Vec<Message> },

    /// 412/428: the resource changed since it was fetched. Re-fetch and re-apply.
    #[error("precondition failed: {uri}")]
    PreconditionFailed { uri: String, messages: Vec<Message> },

    /// 409.
    #[error("conflict: {uri}")]
    Conflict { uri: String, messages: Vec<Message> },

    /// 400: the request must be corrected.
    #[error("bad request: {uri}{}", summarize(.messages))]
    BadRequest { uri: String, messages: Vec<Message> },

    /// The operation is not implemented by the service for this resource.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Connection failure, timeout or gateway status (502/503/504). The caller may retry.
    #[error("transient network error: {0}")]
    TransientNetwork(String),

    /// Any other non-2xx status.
    #[error("server error [{status}]: {uri}{}", summarize(.messages))]
    Server {
        status: u16,
        uri: String,
        messages: Vec<Message>,
    },

    /// The body could not be decoded as the expected shape.
    #[error("decode error for {uri}: {reason}")]
    Decode { uri: String, reason: String },

    /// One or more items of a fan-out read failed.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Collection paging revisited a page.
    #[error("collection paging loop detected at {uri}")]
    LoopDetected { uri: String },

    /// The cancellation signal was observed.
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),
}

fn summarize(messages: &[Message]) -> String {
    match messages.iter().rev().find(|m| m.message.is_some()) {
        Some(m) => format!(" ({})", m),
        None => String::new(),
    }
}

impl RedfishError {
    /// Map a non-2xx response to an error, decoding any protocol error body.
    pub fn from_response(uri: &str, response: &HttpResponse) -> Self {
        let uri = uri.to_string();
        let messages = decode_error_messages(&response.body);
        match response.status {
            400 => RedfishError::BadRequest { uri, messages },
            401 => RedfishError::Unauthorized { uri, messages },
            403 => RedfishError::Forbidden { uri, messages },
            404 => RedfishError::NotFound { uri, messages },
            405 => RedfishError::NotSupported(format!("method not allowed on {}", uri)),
            409 => RedfishError::Conflict { uri, messages },
            412 | 428 => RedfishError::PreconditionFailed { uri, messages },
            502..=504 => {
                RedfishError::TransientNetwork(format!("{} returned {}", uri, response.status))
            }
            status => RedfishError::Server {
                status,
                uri,
                messages,
            },
        }
    }

    /// Registry messages attached by the service, if any.
    pub fn messages(&self) -> &[Message] {
        match self {
            RedfishError::Unauthorized { messages, .. }
            | RedfishError::Forbidden { messages, .. }
            | RedfishError::NotFound { messages, .. }
            | RedfishError::PreconditionFailed { messages, .. }
            | RedfishError::Conflict { messages, .. }
            | RedfishError::BadRequest { messages, .. }
            | RedfishError::Server { messages, .. } => messages,
            _ => &[],
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RedfishError::TransientNetwork(_))
    }

    /// Whether the error means the resource must be re-fetched before retrying.
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, RedfishError::PreconditionFailed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RedfishError::NotFound { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RedfishError::Cancelled)
    }

    pub(crate) fn decode(uri: &str, err: impl std::fmt::Display) -> Self {
        RedfishError::Decode {
            uri: uri.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<TransportError> for RedfishError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Config(msg) => RedfishError::Config(msg),
            TransportError::InvalidUri(msg) => RedfishError::Config(format!("invalid uri: {}", msg)),
            other => RedfishError::TransientNetwork(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for RedfishError {
    fn from(err: serde_json::Error) -> Self {
        RedfishError::Decode {
            uri: String::new(),
            reason: err.to_string(),
        }
    }
}

/// A failed item of a fan-out read.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the URI in the input list.
    pub index: usize,
    pub uri: String,
    pub error: RedfishError,
}

/// Per-URI failures of a fan-out read. Only built when at least one item failed.
#[derive(Debug, Error)]
#[error("{} of {total} fetches failed: {}", .failures.len(), describe(.failures))]
pub struct CollectionError {
    /// Number of URIs in the batch.
    pub total: usize,
    /// Failures in input order.
    pub failures: Vec<ItemFailure>,
}

fn describe(failures: &[ItemFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.uri, f.error))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CollectionError {
    /// Error recorded for the given URI.
    pub fn get(&self, uri: &str) -> Option<&RedfishError> {
        self.failures
            .iter()
            .find(|f| f.uri == uri)
            .map(|f| &f.error)
    }

    /// URIs that failed, in input order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.uri.as_str())
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

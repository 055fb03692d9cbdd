// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registry messages and the protocol error body.

use serde::{Deserialize, Serialize};

/// A structured diagnostic from the service.
///
/// Messages are attached to errors and tasks as context; they are never
/// errors by themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Registry-qualified id, e.g. `Base.1.8.PropertyValueNotInList`.
    #[serde(rename = "MessageId", default)]
    pub message_id: String,
    /// Human-readable text with arguments substituted.
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "MessageArgs", default, skip_serializing_if = "Vec::is_empty")]
    pub message_args: Vec<String>,
    /// Deprecated severity string (`OK`, `Warning`, `Critical`).
    #[serde(rename = "Severity", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Severity from the `Resource.Health` enum.
    #[serde(rename = "MessageSeverity", default, skip_serializing_if = "Option::is_none")]
    pub message_severity: Option<String>,
    /// Suggested corrective action.
    #[serde(rename = "Resolution", default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// JSON pointers to the properties the message is about.
    #[serde(rename = "RelatedProperties", default, skip_serializing_if = "Vec::is_empty")]
    pub related_properties: Vec<String>,
}

impl Message {
    /// Severity, preferring `MessageSeverity` over the deprecated `Severity`.
    pub fn severity(&self) -> Option<&str> {
        self.message_severity
            .as_deref()
            .or(self.severity.as_deref())
    }

    /// Registry prefix of the message id (`Base` in `Base.1.8.Success`).
    pub fn registry(&self) -> Option<&str> {
        self.message_id.split('.').next().filter(|s| !s.is_empty())
    }

    /// Message key, the last segment of the id (`Success` in `Base.1.8.Success`).
    pub fn key(&self) -> Option<&str> {
        self.message_id.rsplit('.').next().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(text) => write!(f, "{}: {}", self.message_id, text),
            None => f.write_str(&self.message_id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "@Message.ExtendedInfo", default)]
    extended_info: Vec<Message>,
}

/// Extract messages from a protocol error body.
///
/// The top-level `code`/`message` pair is returned as the first message
/// when present, followed by every `@Message.ExtendedInfo` entry. Bodies
/// that do not follow the error schema yield no messages.
pub fn decode_error_messages(body: &[u8]) -> Vec<Message> {
    let envelope: ErrorEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) => return Vec::new(),
    };

    let mut messages = Vec::with_capacity(envelope.error.extended_info.len() + 1);
    if let Some(code) = envelope.error.code {
        messages.push(Message {
            message_id: code,
            message: envelope.error.message,
            ..Message::default()
        });
    }
    messages.extend(envelope.error.extended_info);
    messages
}

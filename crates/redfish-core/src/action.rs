// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action discovery and dispatch.
//!
//! Actions are advertised under a resource's `Actions` object, keyed by
//! `#<Type>.<Action>`, each with a `target` URI to POST to and optional
//! `<Param>@Redfish.AllowableValues` lists. The lists are informational: the
//! service validates parameters, the library does not.

use std::collections::BTreeMap;

use redfish_http::HttpResponse;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::client::ApiClient;
use crate::error::{RedfishError, Result};
use crate::task::TaskMonitor;

const ALLOWABLE_SUFFIXES: &[&str] = &["@Redfish.AllowableValues", "@AllowableValues"];

/// One advertised action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTarget {
    /// URI to POST to. Empty when the service does not advertise it.
    pub target: String,
    pub title: Option<String>,
    /// URI of the `ActionInfo` resource describing the parameters.
    pub action_info: Option<String>,
    /// Allowable values per parameter name.
    pub allowable_values: BTreeMap<String, Vec<String>>,
}

static UNADVERTISED: ActionTarget = ActionTarget {
    target: String::new(),
    title: None,
    action_info: None,
    allowable_values: BTreeMap::new(),
};

impl ActionTarget {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Whether the service advertised a target for this action.
    pub fn is_supported(&self) -> bool {
        !self.target.is_empty()
    }

    /// Allowable values for `parameter`, empty when none are listed.
    pub fn allowable(&self, parameter: &str) -> &[String] {
        self.allowable_values
            .get(parameter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut action = ActionTarget::default();
        for (key, value) in map {
            match key.as_str() {
                "target" => action.target = value.as_str().unwrap_or_default().to_string(),
                "title" => action.title = value.as_str().map(str::to_string),
                "@Redfish.ActionInfo" => action.action_info = value.as_str().map(str::to_string),
                _ => {
                    let Some(parameter) = ALLOWABLE_SUFFIXES
                        .iter()
                        .find_map(|suffix| key.strip_suffix(suffix))
                    else {
                        continue;
                    };
                    let values = match value {
                        Value::Array(items) => items
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                        _ => Vec::new(),
                    };
                    action.allowable_values.insert(parameter.to_string(), values);
                }
            }
        }
        action
    }
}

impl<'de> Deserialize<'de> for ActionTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(ActionTarget::from_map(map))
    }
}

impl Serialize for ActionTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("target", &self.target)?;
        if let Some(title) = &self.title {
            map.serialize_entry("title", title)?;
        }
        if let Some(info) = &self.action_info {
            map.serialize_entry("@Redfish.ActionInfo", info)?;
        }
        for (parameter, values) in &self.allowable_values {
            map.serialize_entry(&format!("{}@Redfish.AllowableValues", parameter), values)?;
        }
        map.end()
    }
}

/// The `Actions` block of a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Actions {
    actions: BTreeMap<String, ActionTarget>,
    oem: Option<Value>,
}

impl Actions {
    /// Look an action up by full key (`#ComputerSystem.Reset`) or by its
    /// bare name (`Reset`).
    pub fn find(&self, name: &str) -> Option<&ActionTarget> {
        self.actions.get(name).or_else(|| {
            self.actions
                .iter()
                .find(|(key, _)| key.rsplit('.').next() == Some(name))
                .map(|(_, action)| action)
        })
    }

    /// Like [`Actions::find`], but an unadvertised action yields a target
    /// with an empty URI, which [`invoke`] rejects as not supported.
    pub fn get(&self, name: &str) -> &ActionTarget {
        self.find(name).unwrap_or(&UNADVERTISED)
    }

    pub fn insert(&mut self, key: impl Into<String>, action: ActionTarget) {
        self.actions.insert(key.into(), action);
    }

    /// Advertised actions keyed by `#<Type>.<Action>`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionTarget)> {
        self.actions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Vendor-specific actions, undecoded.
    pub fn oem(&self) -> Option<&Value> {
        self.oem.as_ref()
    }
}

impl<'de> Deserialize<'de> for Actions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut actions = Actions::default();
        for (key, value) in map {
            if key == "Oem" {
                actions.oem = Some(value);
            } else if key.starts_with('#') {
                match value {
                    Value::Object(body) => {
                        actions.actions.insert(key, ActionTarget::from_map(body));
                    }
                    Value::Null => {
                        actions.actions.insert(key, ActionTarget::default());
                    }
                    other => {
                        warn!(key = %key, value = %other, "Ignoring malformed action entry");
                    }
                }
            } else {
                warn!(key = %key, "Ignoring unrecognized entry in Actions");
            }
        }
        Ok(actions)
    }
}

impl Serialize for Actions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, action) in &self.actions {
            map.serialize_entry(key, action)?;
        }
        if let Some(oem) = &self.oem {
            map.serialize_entry("Oem", oem)?;
        }
        map.end()
    }
}

/// Response to an action invocation.
#[derive(Debug)]
pub enum ActionResponse {
    /// Synchronous completion, with the response (possibly bodiless).
    Completed(HttpResponse),
    /// The service runs the action as a task.
    Accepted(TaskMonitor),
}

impl ActionResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionResponse::Accepted(_))
    }

    pub fn into_monitor(self) -> Option<TaskMonitor> {
        match self {
            ActionResponse::Accepted(monitor) => Some(monitor),
            ActionResponse::Completed(_) => None,
        }
    }

    /// The final response, waiting on the task monitor when needed.
    pub async fn finish(self) -> Result<HttpResponse> {
        match self {
            ActionResponse::Completed(response) => Ok(response),
            ActionResponse::Accepted(monitor) => monitor.wait().await,
        }
    }
}

/// POST `body` to the action's target.
///
/// Fails with [`RedfishError::NotSupported`] without any request when the
/// action has no target. A `202 Accepted` carrying `Location` yields a task
/// monitor; any other success is returned as is.
#[instrument(skip(client, action, body), fields(target = %action.target))]
pub async fn invoke<B: Serialize + ?Sized>(
    client: &ApiClient,
    action: &ActionTarget,
    body: &B,
) -> Result<ActionResponse> {
    if !action.is_supported() {
        return Err(RedfishError::NotSupported(
            "action is not advertised by the service".to_string(),
        ));
    }

    let response = client.post_json(&action.target, body).await?;
    match TaskMonitor::from_response(client, &response) {
        Some(monitor) => {
            debug!(monitor = monitor.uri(), "Action accepted as task");
            Ok(ActionResponse::Accepted(monitor))
        }
        None => Ok(ActionResponse::Completed(response)),
    }
}

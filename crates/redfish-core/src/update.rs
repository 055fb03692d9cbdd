// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Update engine: commit in-memory mutations as a minimal PATCH.
//!
//! The pre-mutation state is re-derived from the raw bytes captured at fetch
//! time, so callers mutate fields freely with no dirty tracking. Only the
//! properties a shape declares in [`Resource::WRITABLE`] are compared, and
//! only those that changed are sent.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{RedfishError, Result};
use crate::entity::Resource;
use crate::fetch::decode_resource;
use crate::odata::ODATA_ID;
use crate::task::TaskMonitor;

/// Result of [`commit`].
#[derive(Debug)]
pub enum CommitOutcome {
    /// Nothing changed; no request was sent.
    Unchanged,
    /// The service applied the update synchronously.
    Applied,
    /// The service accepted the update as a task.
    Accepted(TaskMonitor),
}

impl CommitOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, CommitOutcome::Unchanged)
    }

    /// The task monitor, for updates accepted asynchronously.
    pub fn into_monitor(self) -> Option<TaskMonitor> {
        match self {
            CommitOutcome::Accepted(monitor) => Some(monitor),
            _ => None,
        }
    }
}

/// Writable properties whose value differs between `original` and `current`.
///
/// The payload uses the wire names and nesting of the resource. A property
/// absent from one side compares as `null`; arrays compare element-wise in
/// order.
pub fn diff<T: Resource>(original: &T, current: &T) -> Result<Map<String, Value>> {
    let original = serde_json::to_value(original)?;
    let current = serde_json::to_value(current)?;

    let mut payload = Map::new();
    for path in T::WRITABLE {
        let before = lookup(&original, path);
        let after = lookup(&current, path);
        if before != after {
            insert(&mut payload, path, after.clone());
        }
    }
    Ok(payload)
}

fn lookup<'a>(value: &'a Value, path: &str) -> &'a Value {
    path.split('.')
        .try_fold(value, |node, key| node.get(key))
        .unwrap_or(&Value::Null)
}

fn insert(payload: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut node = payload;
    while let Some(key) = segments.next() {
        if segments.peek().is_none() {
            node.insert(key.to_string(), value);
            return;
        }
        let child = node
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        node = match child {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

/// Send the caller's changes to `resource` as one conditional PATCH.
///
/// - no changed writable property: returns [`CommitOutcome::Unchanged`]
///   without contacting the service
/// - otherwise PATCHes the changed properties to the resource's URI with
///   `If-Match` set to its ETag, when it has one
///
/// After a synchronous success the resource's snapshot and ETag describe the
/// new server state, so committing again without further changes is a no-op.
/// A 412/428 surfaces as [`RedfishError::PreconditionFailed`]: re-fetch,
/// re-apply and commit again.
#[instrument(skip(resource), fields(uri = %resource.odata_id()))]
pub async fn commit<T: Resource>(resource: &mut T) -> Result<CommitOutcome> {
    if T::WRITABLE.is_empty() {
        return Ok(CommitOutcome::Unchanged);
    }

    let uri = resource.odata_id().to_string();
    let raw = resource.entity().raw().cloned().ok_or_else(|| {
        RedfishError::NotSupported(format!("{} has no server snapshot to diff against", uri))
    })?;

    let original: T = serde_json::from_slice(&raw).map_err(|e| RedfishError::decode(&uri, e))?;
    let payload = diff(&original, resource)?;
    if payload.is_empty() {
        debug!("No writable property changed");
        return Ok(CommitOutcome::Unchanged);
    }

    debug!(properties = ?payload.keys().collect::<Vec<_>>(), "Committing changes");

    let client = resource.client()?.clone();
    let etag = resource.entity().etag.clone();
    let response = client
        .patch_json(&uri, &Value::Object(payload), etag.as_deref())
        .await?;

    if let Some(monitor) = TaskMonitor::from_response(&client, &response) {
        debug!(monitor = monitor.uri(), "Update accepted as task");
        return Ok(CommitOutcome::Accepted(monitor));
    }

    let etag = response.headers.etag().map(str::to_string);
    if returns_resource(&response.body) {
        match decode_resource(&client, &uri, response) {
            Ok(updated) => {
                *resource = updated;
                return Ok(CommitOutcome::Applied);
            }
            Err(e) => debug!(error = %e, "Keeping local state, response body is not this shape"),
        }
    }

    let snapshot = serde_json::to_vec(resource)?;
    let entity = resource.entity_mut();
    entity.etag = etag;
    entity.set_raw(snapshot.into());

    Ok(CommitOutcome::Applied)
}

// A PATCH may answer with the updated resource, a message body or nothing.
fn returns_resource(body: &[u8]) -> bool {
    serde_json::from_slice::<Value>(body)
        .map(|v| v.get(ODATA_ID).is_some())
        .unwrap_or(false)
}

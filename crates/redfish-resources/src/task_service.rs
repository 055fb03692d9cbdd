// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! TaskService: the collection of tasks the service is running.

use redfish_core::{Batch, Entity, Link, Resource, Result, Task, fetch_collection};
use serde::{Deserialize, Serialize};

use crate::common::{Status, required};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskService {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "ServiceEnabled", default, skip_serializing_if = "Option::is_none")]
    pub service_enabled: Option<bool>,
    /// `Manual` or `Oldest`.
    #[serde(rename = "CompletedTaskOverWritePolicy", default, skip_serializing_if = "Option::is_none")]
    pub completed_task_overwrite_policy: Option<String>,
    #[serde(rename = "LifeCycleEventOnTaskStateChange", default, skip_serializing_if = "Option::is_none")]
    pub event_on_state_change: Option<bool>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Tasks", default, skip_serializing_if = "Link::is_empty")]
    pub tasks: Link,
}
redfish_core::resource!(TaskService, ["ServiceEnabled"]);

impl TaskService {
    pub async fn tasks(&self) -> Result<Batch<Task>> {
        let uri = required(&self.tasks, "Tasks", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ServiceRoot: the entry point of the resource graph.

use redfish_core::{
    ApiClient, Batch, Entity, Link, Resource, Result, SERVICE_ROOT, fetch, fetch_collection,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chassis::Chassis;
use crate::fabric::Fabric;
use crate::common::required;
use crate::system::ComputerSystem;
use crate::task_service::TaskService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRoot {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "RedfishVersion", default, skip_serializing_if = "Option::is_none")]
    pub redfish_version: Option<String>,
    #[serde(rename = "UUID", default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "Vendor", default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(rename = "Product", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(rename = "Systems", default, skip_serializing_if = "Link::is_empty")]
    pub systems: Link,
    #[serde(rename = "Chassis", default, skip_serializing_if = "Link::is_empty")]
    pub chassis: Link,
    #[serde(rename = "Fabrics", default, skip_serializing_if = "Link::is_empty")]
    pub fabrics: Link,
    #[serde(rename = "TaskService", default, skip_serializing_if = "Link::is_empty")]
    pub task_service: Link,
}
redfish_core::resource!(ServiceRoot);

impl ServiceRoot {
    /// Fetch the service root at its well-known URI.
    pub async fn fetch(client: &ApiClient) -> Result<Self> {
        let root: Self = fetch(client, SERVICE_ROOT).await?;
        debug!(
            version = root.redfish_version.as_deref().unwrap_or("unknown"),
            vendor = root.vendor.as_deref().unwrap_or("unknown"),
            "Connected to service"
        );
        Ok(root)
    }

    pub async fn systems(&self) -> Result<Batch<ComputerSystem>> {
        let uri = required(&self.systems, "Systems", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    pub async fn chassis(&self) -> Result<Batch<Chassis>> {
        let uri = required(&self.chassis, "Chassis", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    pub async fn fabrics(&self) -> Result<Batch<Fabric>> {
        let uri = required(&self.fabrics, "Fabrics", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    /// The task service, when the service has one.
    pub async fn task_service(&self) -> Result<Option<TaskService>> {
        self.task_service.fetch(self.client()?).await
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Storage subsystem and its controllers.

use redfish_core::{
    Batch, EmbeddedOrReferenced, Entity, Link, Links, Resource, Result, fetch_collection,
    resolve_all,
};
use serde::{Deserialize, Serialize};

use crate::common::{Status, required};
use crate::drive::Drive;
use crate::volume::Volume;

/// A storage controller, either embedded in its storage resource or served
/// from the controller collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageController {
    #[serde(flatten)]
    pub entity: Entity,
    /// Index within an embedded `StorageControllers` array.
    #[serde(rename = "MemberId", default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(rename = "Manufacturer", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "FirmwareVersion", default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(rename = "SpeedGbps", default, skip_serializing_if = "Option::is_none")]
    pub speed_gbps: Option<f64>,
    #[serde(rename = "SupportedRAIDTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub supported_raid_types: Vec<String>,
    #[serde(rename = "Status", default)]
    pub status: Status,
}
redfish_core::resource!(StorageController);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "StorageControllers", default, skip_serializing_if = "Vec::is_empty")]
    pub storage_controllers: Vec<EmbeddedOrReferenced<StorageController>>,
    /// Controller collection, on services that expose one.
    #[serde(rename = "Controllers", default, skip_serializing_if = "Link::is_empty")]
    pub controllers: Link,
    #[serde(rename = "Drives", default)]
    pub drives: Links,
    #[serde(rename = "Drives@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub drives_count: Option<u64>,
    #[serde(rename = "Volumes", default, skip_serializing_if = "Link::is_empty")]
    pub volumes: Link,
    #[serde(rename = "Status", default)]
    pub status: Status,
}
redfish_core::resource!(Storage);

impl Storage {
    /// Controllers of this subsystem.
    ///
    /// Prefers the controller collection; falls back to the
    /// `StorageControllers` array, fetching any members served as references.
    pub async fn controllers(&self) -> Result<Vec<StorageController>> {
        let client = self.client()?;
        match self.controllers.uri() {
            Some(uri) => fetch_collection(client, uri).await?.into_result(),
            None => resolve_all(client, &self.storage_controllers).await,
        }
    }

    pub async fn drives(&self) -> Result<Batch<Drive>> {
        redfish_core::check_count("Drives", &self.drives, self.drives_count);
        self.drives.fetch(self.client()?).await
    }

    pub async fn volumes(&self) -> Result<Batch<Volume>> {
        let uri = required(&self.volumes, "Volumes", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_controllers_embedded_or_referenced() {
        let storage: Storage = serde_json::from_value(json!({
            "@odata.id": "/redfish/v1/Systems/1/Storage/1",
            "Id": "1",
            "StorageControllers": [
                {
                    "@odata.id": "/redfish/v1/Systems/1/Storage/1#/StorageControllers/0",
                    "MemberId": "0",
                    "Model": "PERC H755",
                    "SupportedRAIDTypes": ["RAID0", "RAID1"]
                },
                {"@odata.id": "/redfish/v1/Systems/1/Storage/1/Controllers/1"}
            ],
            "Drives": [{"@odata.id": "/d/0"}],
            "Drives@odata.count": 1,
            "Volumes": {"@odata.id": "/redfish/v1/Systems/1/Storage/1/Volumes"}
        }))
        .unwrap();

        let controllers = &storage.storage_controllers;
        assert_eq!(controllers.len(), 2);
        assert_eq!(
            controllers[0].embedded().and_then(|c| c.model.as_deref()),
            Some("PERC H755")
        );
        assert!(!controllers[1].is_embedded());
        assert_eq!(controllers[1].uri(), "/redfish/v1/Systems/1/Storage/1/Controllers/1");
        assert!(storage.controllers.is_empty());
    }
}

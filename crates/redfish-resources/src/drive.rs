// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Drive: a single storage device.

use redfish_core::{
    ActionResponse, Actions, Batch, Entity, Link, Links, Resource, Result, check_count, invoke,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::chassis::Chassis;
use crate::common::{IndicatorLed, Status};
use crate::volume::Volume;

const SECURE_ERASE: &str = "#Drive.SecureErase";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveLinks {
    #[serde(rename = "Volumes", default)]
    pub volumes: Links,
    #[serde(rename = "Volumes@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub volumes_count: Option<u64>,
    #[serde(rename = "Endpoints", default)]
    pub endpoints: Links,
    #[serde(rename = "Chassis", default, skip_serializing_if = "Link::is_empty")]
    pub chassis: Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drive {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "Manufacturer", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "SerialNumber", default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "AssetTag", default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(rename = "IndicatorLED", default, skip_serializing_if = "Option::is_none")]
    pub indicator_led: Option<IndicatorLed>,
    /// `HDD` or `SSD`.
    #[serde(rename = "MediaType", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// `SAS`, `SATA`, `NVMe`, ...
    #[serde(rename = "Protocol", default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(rename = "CapacityBytes", default, skip_serializing_if = "Option::is_none")]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "BlockSizeBytes", default, skip_serializing_if = "Option::is_none")]
    pub block_size_bytes: Option<u64>,
    #[serde(rename = "WriteCacheEnabled", default, skip_serializing_if = "Option::is_none")]
    pub write_cache_enabled: Option<bool>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    /// Volume references placed directly on the drive by older schemas.
    #[serde(rename = "Volumes", default, skip_serializing_if = "Links::is_empty")]
    pub volumes: Links,
    #[serde(rename = "Links", default)]
    pub links: DriveLinks,
    #[serde(rename = "Actions", default)]
    pub actions: Actions,
}
redfish_core::resource!(Drive, ["AssetTag", "IndicatorLED", "WriteCacheEnabled"]);

impl Drive {
    /// Volume references, from either schema layout.
    pub fn volume_links(&self) -> &Links {
        self.volumes.or(&self.links.volumes)
    }

    /// Volumes hosted on this drive.
    pub async fn volumes(&self) -> Result<Batch<Volume>> {
        let links = self.volume_links();
        check_count("Volumes", links, self.links.volumes_count);
        links.fetch(self.client()?).await
    }

    pub async fn chassis(&self) -> Result<Option<Chassis>> {
        self.links.chassis.fetch(self.client()?).await
    }

    /// Invoke the SecureErase action. Usually runs as a task.
    #[instrument(skip(self), fields(drive = %self.odata_id()))]
    pub async fn secure_erase(&self) -> Result<ActionResponse> {
        invoke(self.client()?, self.actions.get(SECURE_ERASE), &json!({})).await
    }
}

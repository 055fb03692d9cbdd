// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Volume: a logical unit of storage presented to hosts.

use redfish_core::{ActionResponse, Actions, Batch, Entity, Links, Resource, Result, invoke};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::common::Status;
use crate::drive::Drive;

const INITIALIZE: &str = "#Volume.Initialize";

/// How a volume is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitializeType {
    /// Write zeros to every block before completing.
    Slow,
    /// Make the volume available immediately, initializing in the background.
    Fast,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeLinks {
    #[serde(rename = "Drives", default)]
    pub drives: Links,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "DisplayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "CapacityBytes", default, skip_serializing_if = "Option::is_none")]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "BlockSizeBytes", default, skip_serializing_if = "Option::is_none")]
    pub block_size_bytes: Option<u64>,
    /// `RAID0`, `RAID1`, `RAID5`, ...
    #[serde(rename = "RAIDType", default, skip_serializing_if = "Option::is_none")]
    pub raid_type: Option<String>,
    #[serde(rename = "Encrypted", default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    #[serde(rename = "WriteCachePolicy", default, skip_serializing_if = "Option::is_none")]
    pub write_cache_policy: Option<String>,
    #[serde(rename = "ReadCachePolicy", default, skip_serializing_if = "Option::is_none")]
    pub read_cache_policy: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Links", default)]
    pub links: VolumeLinks,
    #[serde(rename = "Actions", default)]
    pub actions: Actions,
}
redfish_core::resource!(
    Volume,
    ["DisplayName", "WriteCachePolicy", "ReadCachePolicy"]
);

impl Volume {
    pub async fn drives(&self) -> Result<Batch<Drive>> {
        self.links.drives.fetch(self.client()?).await
    }

    /// Invoke the Initialize action.
    #[instrument(skip(self), fields(volume = %self.odata_id()))]
    pub async fn initialize(&self, kind: InitializeType) -> Result<ActionResponse> {
        invoke(
            self.client()?,
            self.actions.get(INITIALIZE),
            &json!({ "InitializeType": kind }),
        )
        .await
    }

    /// Initialize types the service advertises.
    pub fn supported_initialize_types(&self) -> &[String] {
        self.actions.get(INITIALIZE).allowable("InitializeType")
    }
}

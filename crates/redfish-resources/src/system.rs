// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ComputerSystem: a logical server, its boot settings and reset action.

use redfish_core::{
    ActionResponse, Actions, Batch, Entity, Link, Links, Resource, Result, fetch_collection,
    invoke,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::chassis::Chassis;
use crate::common::{IndicatorLed, PowerState, Status, required};
use crate::processor::Processor;
use crate::storage::Storage;

const RESET: &str = "#ComputerSystem.Reset";

/// Reset request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    On,
    ForceOff,
    GracefulShutdown,
    GracefulRestart,
    ForceRestart,
    Nmi,
    ForceOn,
    PushPowerButton,
    PowerCycle,
    Suspend,
    Pause,
    Resume,
}

/// Boot source override settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boot {
    /// `Pxe`, `Hdd`, `Cd`, `BiosSetup`, `UefiTarget`, ...
    #[serde(rename = "BootSourceOverrideTarget", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// `Disabled`, `Once` or `Continuous`.
    #[serde(rename = "BootSourceOverrideEnabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    /// `Legacy` or `UEFI`.
    #[serde(rename = "BootSourceOverrideMode", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(rename = "UefiTargetBootSourceOverride", default, skip_serializing_if = "Option::is_none")]
    pub uefi_target: Option<String>,
    #[serde(rename = "BootOrder", default, skip_serializing_if = "Vec::is_empty")]
    pub boot_order: Vec<String>,
    #[serde(
        rename = "BootSourceOverrideTarget@Redfish.AllowableValues",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allowable_targets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLinks {
    #[serde(rename = "Chassis", default)]
    pub chassis: Links,
    #[serde(rename = "ManagedBy", default)]
    pub managed_by: Links,
    #[serde(rename = "Endpoints", default)]
    pub endpoints: Links,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputerSystem {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "SystemType", default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    #[serde(rename = "Manufacturer", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "SerialNumber", default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "UUID", default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "HostName", default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(rename = "AssetTag", default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(rename = "IndicatorLED", default, skip_serializing_if = "Option::is_none")]
    pub indicator_led: Option<IndicatorLed>,
    #[serde(rename = "PowerState", default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Boot", default)]
    pub boot: Boot,
    #[serde(rename = "Processors", default, skip_serializing_if = "Link::is_empty")]
    pub processors: Link,
    #[serde(rename = "Storage", default, skip_serializing_if = "Link::is_empty")]
    pub storage: Link,
    #[serde(rename = "Links", default)]
    pub links: SystemLinks,
    #[serde(rename = "Actions", default)]
    pub actions: Actions,
}
redfish_core::resource!(
    ComputerSystem,
    [
        "AssetTag",
        "HostName",
        "IndicatorLED",
        "Boot.BootSourceOverrideTarget",
        "Boot.BootSourceOverrideEnabled",
        "Boot.BootSourceOverrideMode",
        "Boot.UefiTargetBootSourceOverride",
        "Boot.BootOrder",
    ]
);

impl ComputerSystem {
    /// Reset types the service advertises, empty when it lists none.
    pub fn supported_reset_types(&self) -> Vec<ResetType> {
        self.actions
            .get(RESET)
            .allowable("ResetType")
            .iter()
            .filter_map(|value| serde_json::from_value(json!(value)).ok())
            .collect()
    }

    /// Invoke the Reset action.
    #[instrument(skip(self), fields(system = %self.odata_id()))]
    pub async fn reset(&self, reset_type: ResetType) -> Result<ActionResponse> {
        invoke(
            self.client()?,
            self.actions.get(RESET),
            &json!({ "ResetType": reset_type }),
        )
        .await
    }

    /// Set a boot source override. Takes effect on [`redfish_core::commit`].
    pub fn set_boot_override(&mut self, target: impl Into<String>, enabled: impl Into<String>) {
        self.boot.target = Some(target.into());
        self.boot.enabled = Some(enabled.into());
    }

    pub async fn processors(&self) -> Result<Batch<Processor>> {
        let uri = required(&self.processors, "Processors", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    pub async fn storage(&self) -> Result<Batch<Storage>> {
        let uri = required(&self.storage, "Storage", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    pub async fn chassis(&self) -> Result<Batch<Chassis>> {
        self.links.chassis.fetch(self.client()?).await
    }
}

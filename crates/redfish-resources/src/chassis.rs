// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Chassis: the physical enclosure of systems and drives.

use redfish_core::{Batch, Entity, Link, Links, Resource, Result, fetch_collection};
use serde::{Deserialize, Serialize};

use crate::common::{IndicatorLed, PowerState, Status};
use crate::drive::Drive;
use crate::system::ComputerSystem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChassisLinks {
    #[serde(rename = "ComputerSystems", default)]
    pub computer_systems: Links,
    #[serde(rename = "Drives", default)]
    pub drives: Links,
    #[serde(rename = "Contains", default)]
    pub contains: Links,
    #[serde(rename = "ContainedBy", default, skip_serializing_if = "Link::is_empty")]
    pub contained_by: Link,
    #[serde(rename = "ManagedBy", default)]
    pub managed_by: Links,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chassis {
    #[serde(flatten)]
    pub entity: Entity,
    /// `Rack`, `Blade`, `Enclosure`, `StorageEnclosure`, ...
    #[serde(rename = "ChassisType", default, skip_serializing_if = "Option::is_none")]
    pub chassis_type: Option<String>,
    #[serde(rename = "Manufacturer", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "SerialNumber", default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "PartNumber", default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(rename = "AssetTag", default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(rename = "IndicatorLED", default, skip_serializing_if = "Option::is_none")]
    pub indicator_led: Option<IndicatorLed>,
    #[serde(rename = "PowerState", default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    /// Drive collection, on services that expose one.
    #[serde(rename = "Drives", default, skip_serializing_if = "Link::is_empty")]
    pub drives: Link,
    #[serde(rename = "Links", default)]
    pub links: ChassisLinks,
}
redfish_core::resource!(Chassis, ["AssetTag", "IndicatorLED"]);

impl Chassis {
    /// Drives in this chassis.
    ///
    /// Uses the drive collection when the service has one, otherwise the
    /// `Links.Drives` references.
    pub async fn drives(&self) -> Result<Batch<Drive>> {
        let client = self.client()?;
        match self.drives.uri() {
            Some(uri) => fetch_collection(client, uri).await,
            None => self.links.drives.fetch(client).await,
        }
    }

    pub async fn computer_systems(&self) -> Result<Batch<ComputerSystem>> {
        self.links.computer_systems.fetch(self.client()?).await
    }

    /// The enclosing chassis, if any.
    pub async fn contained_by(&self) -> Result<Option<Chassis>> {
        self.links.contained_by.fetch(self.client()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode() {
        let chassis: Chassis = serde_json::from_value(json!({
            "@odata.id": "/redfish/v1/Chassis/1U",
            "Id": "1U",
            "ChassisType": "RackMount",
            "IndicatorLED": "Lit",
            "Links": {
                "ComputerSystems": [{"@odata.id": "/redfish/v1/Systems/1"}],
                "ContainedBy": {"@odata.id": "/redfish/v1/Chassis/Rack1"},
                "Drives": [{"@odata.id": "/d/0"}, {"@odata.id": "/d/1"}]
            }
        }))
        .unwrap();

        assert_eq!(chassis.indicator_led, Some(IndicatorLed::Lit));
        assert!(chassis.drives.is_empty());
        assert_eq!(chassis.links.drives.len(), 2);
        assert_eq!(chassis.links.contained_by.uri(), Some("/redfish/v1/Chassis/Rack1"));
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Processor.

use redfish_core::Entity;
use redfish_core::tolerant::number_or_string;
use serde::{Deserialize, Serialize};

use crate::common::Status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processor {
    #[serde(flatten)]
    pub entity: Entity,
    /// `CPU`, `GPU`, `FPGA`, ...
    #[serde(rename = "ProcessorType", default, skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<String>,
    #[serde(rename = "ProcessorArchitecture", default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(rename = "Manufacturer", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "Socket", default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    // Some services send these as strings.
    #[serde(
        rename = "MaxSpeedMHz",
        default,
        deserialize_with = "number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_speed_mhz: Option<u32>,
    #[serde(
        rename = "TotalCores",
        default,
        deserialize_with = "number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_cores: Option<u32>,
    #[serde(
        rename = "TotalThreads",
        default,
        deserialize_with = "number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_threads: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: Status,
}
redfish_core::resource!(Processor);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_max_speed_accepts_both_encodings() {
        let numeric: Processor = serde_json::from_value(json!({
            "@odata.id": "/redfish/v1/Systems/1/Processors/CPU0",
            "Id": "CPU0",
            "MaxSpeedMHz": 3700,
            "TotalCores": 8
        }))
        .unwrap();
        let stringly: Processor = serde_json::from_value(json!({
            "@odata.id": "/redfish/v1/Systems/1/Processors/CPU0",
            "Id": "CPU0",
            "MaxSpeedMHz": "3700",
            "TotalCores": "8"
        }))
        .unwrap();

        assert_eq!(numeric.max_speed_mhz, Some(3700));
        assert_eq!(stringly.max_speed_mhz, numeric.max_speed_mhz);
        assert_eq!(stringly.total_cores, Some(8));
        assert_eq!(stringly.total_threads, None);
    }

    #[test]
    fn test_serializes_canonical_numbers() {
        let cpu: Processor =
            serde_json::from_value(json!({"@odata.id": "/p/0", "MaxSpeedMHz": "2400"})).unwrap();
        let value = serde_json::to_value(&cpu).unwrap();
        assert_eq!(value["MaxSpeedMHz"], json!(2400));
    }
}

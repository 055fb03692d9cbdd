// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Property types shared by several resource shapes.

use redfish_core::{Link, RedfishError, Result};
use serde::{Deserialize, Serialize};

/// URI of a collection link, or `NotSupported` when the service omits it.
pub(crate) fn required<'a>(link: &'a Link, name: &str, owner: &str) -> Result<&'a str> {
    link.uri().ok_or_else(|| {
        RedfishError::NotSupported(format!("{} does not link a {} collection", owner, name))
    })
}

/// The `Status` object: state and health of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Health", default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(rename = "HealthRollup", default, skip_serializing_if = "Option::is_none")]
    pub health_rollup: Option<String>,
}

impl Status {
    pub fn is_enabled(&self) -> bool {
        self.state.as_deref() == Some("Enabled")
    }

    pub fn is_healthy(&self) -> bool {
        self.health.as_deref() == Some("OK")
    }
}

/// Indicator LED state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorLed {
    Lit,
    Blinking,
    Off,
    #[serde(other)]
    Unknown,
}

/// Power state of a system or chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    On,
    Off,
    PoweringOn,
    PoweringOff,
    Paused,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status() {
        let status: Status =
            serde_json::from_value(json!({"State": "Enabled", "Health": "OK"})).unwrap();
        assert!(status.is_enabled());
        assert!(status.is_healthy());
        assert!(!Status::default().is_enabled());
    }

    #[test]
    fn test_unknown_enum_values_are_tolerated() {
        let led: IndicatorLed = serde_json::from_value(json!("Flashing")).unwrap();
        assert_eq!(led, IndicatorLed::Unknown);
        let power: PowerState = serde_json::from_value(json!("PoweringOn")).unwrap();
        assert_eq!(power, PowerState::PoweringOn);
    }
}

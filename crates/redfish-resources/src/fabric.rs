// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fabrics, their zones and endpoints.
//!
//! Zone membership is changed by editing [`Zone::links`] and committing: the
//! PATCH carries the complete new `Links.Endpoints` array.

use redfish_core::{Batch, Entity, Link, Links, Resource, Result, fetch_collection};
use serde::{Deserialize, Serialize};

use crate::common::{Status, required};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fabric {
    #[serde(flatten)]
    pub entity: Entity,
    /// `PCIe`, `NVMeOverFabrics`, `Ethernet`, ...
    #[serde(rename = "FabricType", default, skip_serializing_if = "Option::is_none")]
    pub fabric_type: Option<String>,
    #[serde(rename = "MaxZones", default, skip_serializing_if = "Option::is_none")]
    pub max_zones: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Zones", default, skip_serializing_if = "Link::is_empty")]
    pub zones: Link,
    #[serde(rename = "Endpoints", default, skip_serializing_if = "Link::is_empty")]
    pub endpoints: Link,
}
redfish_core::resource!(Fabric);

impl Fabric {
    pub async fn zones(&self) -> Result<Batch<Zone>> {
        let uri = required(&self.zones, "Zones", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }

    pub async fn endpoints(&self) -> Result<Batch<Endpoint>> {
        let uri = required(&self.endpoints, "Endpoints", self.odata_id())?;
        fetch_collection(self.client()?, uri).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneLinks {
    #[serde(rename = "Endpoints", default)]
    pub endpoints: Links,
    #[serde(rename = "InvolvedSwitches", default)]
    pub involved_switches: Links,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    #[serde(flatten)]
    pub entity: Entity,
    /// `ZoneOfEndpoints`, `ZoneOfZones`, `ZoneOfResourceBlocks`, ...
    #[serde(rename = "ZoneType", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Links", default)]
    pub links: ZoneLinks,
}
redfish_core::resource!(Zone, ["Links.Endpoints"]);

impl Zone {
    pub async fn endpoints(&self) -> Result<Batch<Endpoint>> {
        self.links.endpoints.fetch(self.client()?).await
    }

    /// Add an endpoint to the zone. Takes effect on [`redfish_core::commit`].
    pub fn add_endpoint(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if !self.links.endpoints.contains(&uri) {
            self.links.endpoints.push(uri);
        }
    }

    /// Remove an endpoint from the zone. Takes effect on [`redfish_core::commit`].
    pub fn remove_endpoint(&mut self, uri: &str) {
        self.links.endpoints = self
            .links
            .endpoints
            .iter()
            .filter(|u| *u != uri)
            .collect();
    }
}

/// An entity reachable through an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectedEntity {
    /// `Drive`, `StorageInitiator`, `Processor`, ...
    #[serde(rename = "EntityType", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// `Initiator`, `Target` or `Both`.
    #[serde(rename = "EntityRole", default, skip_serializing_if = "Option::is_none")]
    pub entity_role: Option<String>,
    #[serde(rename = "EntityLink", default, skip_serializing_if = "Link::is_empty")]
    pub entity_link: Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "EndpointProtocol", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_protocol: Option<String>,
    #[serde(rename = "ConnectedEntities", default, skip_serializing_if = "Vec::is_empty")]
    pub connected_entities: Vec<ConnectedEntity>,
    #[serde(rename = "Status", default)]
    pub status: Status,
}
redfish_core::resource!(Endpoint);

impl Endpoint {
    /// URIs of the connected entities, in server order.
    pub fn connected_links(&self) -> Links {
        self.connected_entities
            .iter()
            .filter_map(|e| e.entity_link.uri())
            .collect()
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Members that a service may either embed in place or reference by URI.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::client::ApiClient;
use crate::entity::Resource;
use crate::error::{RedfishError, Result};
use crate::fetch::fetch;
use crate::odata::ODATA_ID;

/// A nested resource, present either as a full copy or as a reference.
///
/// An object holding nothing but `@odata.id` is a reference; anything else is
/// decoded as an embedded copy.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedOrReferenced<T> {
    Embedded(T),
    Referenced(String),
}

impl<T> EmbeddedOrReferenced<T> {
    pub fn embedded(&self) -> Option<&T> {
        match self {
            EmbeddedOrReferenced::Embedded(value) => Some(value),
            EmbeddedOrReferenced::Referenced(_) => None,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, EmbeddedOrReferenced::Embedded(_))
    }
}

impl<T: Resource> EmbeddedOrReferenced<T> {
    /// URI of the member.
    pub fn uri(&self) -> &str {
        match self {
            EmbeddedOrReferenced::Embedded(value) => value.odata_id(),
            EmbeddedOrReferenced::Referenced(uri) => uri,
        }
    }

    /// The full resource, fetching it if only a reference was served.
    ///
    /// Embedded copies are returned as decoded, without I/O.
    pub async fn resolve(&self, client: &ApiClient) -> Result<T>
    where
        T: Clone,
    {
        match self {
            EmbeddedOrReferenced::Embedded(value) => Ok(value.clone()),
            EmbeddedOrReferenced::Referenced(uri) => fetch(client, uri).await,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for EmbeddedOrReferenced<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Value::Object(map) = &value {
            if map.len() == 1 {
                if let Some(Value::String(uri)) = map.get(ODATA_ID) {
                    return Ok(EmbeddedOrReferenced::Referenced(uri.clone()));
                }
            }
        }
        T::deserialize(value)
            .map(EmbeddedOrReferenced::Embedded)
            .map_err(serde::de::Error::custom)
    }
}

impl<T: Serialize> Serialize for EmbeddedOrReferenced<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EmbeddedOrReferenced::Embedded(value) => value.serialize(serializer),
            EmbeddedOrReferenced::Referenced(uri) => {
                let mut map = serde_json::Map::with_capacity(1);
                map.insert(ODATA_ID.to_string(), Value::String(uri.clone()));
                map.serialize(serializer)
            }
        }
    }
}

/// Resolve a list of members, fetching referenced ones.
///
/// Fails on the first error. Embedded members are returned without I/O.
pub async fn resolve_all<T: Resource + Clone>(
    client: &ApiClient,
    members: &[EmbeddedOrReferenced<T>],
) -> Result<Vec<T>> {
    if client.is_cancelled() {
        return Err(RedfishError::Cancelled);
    }
    let mut resolved = Vec::with_capacity(members.len());
    for member in members {
        resolved.push(member.resolve(client).await?);
    }
    Ok(resolved)
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Entity base shared by every resource shape.
//!
//! A resource shape embeds an [`Entity`] with `#[serde(flatten)]` and
//! implements [`Resource`] (usually through the [`resource!`](crate::resource)
//! macro). The entity carries the identity properties plus two pieces of state
//! that never appear on the wire: the client handle used to follow links and
//! commit updates, and the raw snapshot of the last server response.

use bytes::Bytes;
use redfish_http::HttpResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::{RedfishError, Result};

/// Identity and transport state common to all resources.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical URI of the resource.
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
    /// Schema type tag, e.g. `#Drive.v1_9_0.Drive`.
    #[serde(rename = "@odata.type", default, skip_serializing_if = "String::is_empty")]
    pub odata_type: String,
    /// Concurrency token. Filled from the `ETag` header when the body has none.
    #[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    handle: Handle,
}

#[derive(Clone, Default)]
struct Handle {
    client: Option<ApiClient>,
    raw: Option<Bytes>,
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("odata_id", &self.odata_id)
            .field("odata_type", &self.odata_type)
            .field("etag", &self.etag)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("attached", &self.handle.client.is_some())
            .field("raw_len", &self.handle.raw.as_ref().map(Bytes::len))
            .finish()
    }
}

// Transport state is not part of a resource's value.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.odata_id == other.odata_id
            && self.odata_type == other.odata_type
            && self.etag == other.etag
            && self.id == other.id
            && self.name == other.name
            && self.description == other.description
    }
}

impl Entity {
    /// Entity with only an origin URI, for building requests by hand.
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            odata_id: uri.into(),
            ..Self::default()
        }
    }

    pub fn odata_id(&self) -> &str {
        &self.odata_id
    }

    /// Client the resource was fetched through.
    pub fn client(&self) -> Result<&ApiClient> {
        self.handle.client.as_ref().ok_or_else(|| {
            RedfishError::NotSupported(format!(
                "resource {} is not attached to a client",
                self.odata_id
            ))
        })
    }

    pub fn is_attached(&self) -> bool {
        self.handle.client.is_some()
    }

    /// Raw bytes of the last server response, kept for writable shapes only.
    pub fn raw(&self) -> Option<&Bytes> {
        self.handle.raw.as_ref()
    }

    pub(crate) fn attach(&mut self, client: ApiClient, raw: Option<Bytes>) {
        self.handle.client = Some(client);
        self.handle.raw = raw;
    }

    pub(crate) fn set_raw(&mut self, raw: Bytes) {
        self.handle.raw = Some(raw);
    }

    /// POST a JSON body to `uri` through the attached client.
    pub async fn post<B: Serialize + ?Sized>(&self, uri: &str, body: &B) -> Result<HttpResponse> {
        self.client()?.post_json(uri, body).await
    }

    /// PATCH a JSON body to this resource, conditional on the stored ETag.
    pub async fn patch<B: Serialize + ?Sized>(&self, body: &B) -> Result<HttpResponse> {
        self.client()?
            .patch_json(&self.odata_id, body, self.etag.as_deref())
            .await
    }

    /// DELETE this resource.
    pub async fn delete(&self) -> Result<HttpResponse> {
        self.client()?.delete(&self.odata_id).await
    }
}

/// A typed resource shape.
///
/// `WRITABLE` lists the server-side property names a client may PATCH.
/// Nested properties use dotted paths (`Boot.BootSourceOverrideTarget`).
/// Shapes with an empty list are read-only: no raw snapshot is kept for
/// them and committing them is a no-op.
pub trait Resource: DeserializeOwned + Serialize + Send + Sync + 'static {
    const WRITABLE: &'static [&'static str] = &[];

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Canonical URI.
    fn odata_id(&self) -> &str {
        &self.entity().odata_id
    }

    /// Client the resource was fetched through.
    fn client(&self) -> Result<&ApiClient> {
        self.entity().client()
    }
}

/// Implement [`Resource`] for a struct whose entity lives in a field named
/// `entity`, optionally declaring its writable properties.
///
/// ```ignore
/// redfish_core::resource!(Drive, ["AssetTag", "IndicatorLED"]);
/// redfish_core::resource!(ServiceRoot);
/// ```
#[macro_export]
macro_rules! resource {
    ($ty:ty) => {
        $crate::resource!($ty, []);
    };
    ($ty:ty, [$($field:literal),* $(,)?]) => {
        impl $crate::Resource for $ty {
            const WRITABLE: &'static [&'static str] = &[$($field),*];

            fn entity(&self) -> &$crate::Entity {
                &self.entity
            }

            fn entity_mut(&mut self) -> &mut $crate::Entity {
                &mut self.entity
            }
        }
    };
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reference values: `{"@odata.id": "<uri>"}` and arrays of them.
//!
//! The protocol places link arrays either directly on a resource or nested
//! under its `Links` object, and some schemas moved between the two across
//! versions. Both decode to the same [`Links`] value; shapes that know both
//! layouts use [`Links::or`] to prefer the direct form.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::client::ApiClient;
use crate::entity::Resource;
use crate::error::Result;
use crate::fetch::{Batch, fetch, fetch_many};

/// Key holding a resource's canonical URI.
pub const ODATA_ID: &str = "@odata.id";

/// Decode any reference-shaped JSON fragment into URIs, preserving order.
///
/// - `null` or a non-reference value decodes to nothing
/// - `{"@odata.id": U}` decodes to `[U]`
/// - arrays decode element-wise; elements without an `@odata.id` are skipped
pub fn decode_references(value: &Value) -> Vec<String> {
    match value {
        Value::Object(_) => reference_uri(value).into_iter().collect(),
        Value::Array(items) => items.iter().filter_map(reference_uri).collect(),
        _ => Vec::new(),
    }
}

fn reference_uri(value: &Value) -> Option<String> {
    value
        .get(ODATA_ID)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn reference_object(uri: &str) -> Value {
    let mut map = serde_json::Map::with_capacity(1);
    map.insert(ODATA_ID.to_string(), Value::String(uri.to_string()));
    Value::Object(map)
}

/// A single reference, possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Link(Option<String>);

impl Link {
    pub fn new(uri: impl Into<String>) -> Self {
        Link(Some(uri.into()))
    }

    /// An absent reference.
    pub fn none() -> Self {
        Link(None)
    }

    pub fn uri(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Fetch the referent. An absent reference yields `None` without I/O.
    pub async fn fetch<T: Resource>(&self, client: &ApiClient) -> Result<Option<T>> {
        match &self.0 {
            Some(uri) => fetch(client, uri).await.map(Some),
            None => Ok(None),
        }
    }
}

impl From<&str> for Link {
    fn from(uri: &str) -> Self {
        Link::new(uri)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
        Ok(Link(decode_references(&value).into_iter().next()))
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Some(uri) => reference_object(uri).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// An ordered array of references. Absent arrays decode empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Links(Vec<String>);

impl Links {
    pub fn new(uris: Vec<String>) -> Self {
        Links(uris)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn push(&mut self, uri: impl Into<String>) {
        self.0.push(uri.into());
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.0.iter().any(|u| u == uri)
    }

    /// `self` when populated, otherwise `fallback`.
    ///
    /// Used to read a link array that may live either directly on the
    /// resource or under `Links`.
    pub fn or<'a>(&'a self, fallback: &'a Links) -> &'a Links {
        if self.is_empty() { fallback } else { self }
    }

    /// Fetch every referent with the client's fan-out limit.
    pub async fn fetch<T: Resource>(&self, client: &ApiClient) -> Result<Batch<T>> {
        fetch_many(client, &self.0).await
    }
}

impl From<Vec<String>> for Links {
    fn from(uris: Vec<String>) -> Self {
        Links(uris)
    }
}

impl<S: Into<String>> FromIterator<S> for Links {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Links(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
        Ok(Links(decode_references(&value)))
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for uri in &self.0 {
            seq.serialize_element(&reference_object(uri))?;
        }
        seq.end()
    }
}

/// Compare a decoded array with its `<name>@odata.count` hint.
///
/// A mismatch is not an error; it is reported as a warning and `false` is
/// returned. An absent hint always matches.
pub fn check_count(name: &str, links: &Links, count: Option<u64>) -> bool {
    match count {
        Some(expected) if expected != links.len() as u64 => {
            warn!(
                property = name,
                expected,
                actual = links.len(),
                "Reference count hint does not match array length"
            );
            false
        }
        _ => true,
    }
}

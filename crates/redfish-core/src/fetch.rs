// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fetch engine: URI → typed resource, in single and fan-out forms.

use futures::StreamExt;
use futures::stream;
use redfish_http::HttpResponse;
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::collection::member_uris;
use crate::entity::Resource;
use crate::error::{CollectionError, ItemFailure, RedfishError, Result};

/// GET `uri` and decode it as `T`.
///
/// The returned resource is attached to `client`, carries the response ETag
/// (unless the body has its own `@odata.etag`) and, for shapes with writable
/// properties, the raw response bytes used by [`crate::commit`]. A body
/// without `@odata.id` gets `uri` as its origin.
#[instrument(skip(client), fields(shape = std::any::type_name::<T>()))]
pub async fn fetch<T: Resource>(client: &ApiClient, uri: &str) -> Result<T> {
    let response = client.get(uri).await?;
    decode_resource(client, uri, response)
}

/// Decode a successful response into an attached resource.
pub(crate) fn decode_resource<T: Resource>(
    client: &ApiClient,
    uri: &str,
    response: HttpResponse,
) -> Result<T> {
    if !response.has_body() {
        return Err(RedfishError::decode(uri, "empty response body"));
    }

    let mut resource: T =
        serde_json::from_slice(&response.body).map_err(|e| RedfishError::decode(uri, e))?;

    let header_etag = response.headers.etag().map(str::to_string);
    let raw = if T::WRITABLE.is_empty() {
        None
    } else {
        Some(response.body)
    };

    let entity = resource.entity_mut();
    if entity.odata_id.is_empty() {
        entity.odata_id = uri.to_string();
    }
    if entity.etag.is_none() {
        entity.etag = header_etag;
    }
    entity.attach(client.clone(), raw);

    Ok(resource)
}

/// Fetch many URIs concurrently, bounded by `ClientConfig::fetch_concurrency`.
///
/// The batch has one slot per input URI, in input order. Failed slots are
/// empty and their errors are collected in the batch's [`CollectionError`].
/// Only cancellation fails the whole call.
#[instrument(skip(client, uris), fields(shape = std::any::type_name::<T>(), count = uris.len()))]
pub async fn fetch_many<T, S>(client: &ApiClient, uris: &[S]) -> Result<Batch<T>>
where
    T: Resource,
    S: AsRef<str> + Sync,
{
    let limit = client.config().fetch_concurrency.max(1);
    let fetches = stream::iter(uris.iter().map(|uri| fetch::<T>(client, uri.as_ref())))
        .buffered(limit)
        .collect::<Vec<_>>();

    let results = tokio::select! {
        biased;
        _ = client.cancellation_token().cancelled() => return Err(RedfishError::Cancelled),
        results = fetches => results,
    };

    let mut slots = Vec::with_capacity(uris.len());
    let mut failures = Vec::new();
    for (index, (uri, result)) in uris.iter().zip(results).enumerate() {
        match result {
            Ok(resource) => slots.push(Some(resource)),
            Err(RedfishError::Cancelled) => return Err(RedfishError::Cancelled),
            Err(error) => {
                debug!(uri = uri.as_ref(), error = %error, "Fan-out item failed");
                failures.push(ItemFailure {
                    index,
                    uri: uri.as_ref().to_string(),
                    error,
                });
                slots.push(None);
            }
        }
    }

    let error = if failures.is_empty() {
        None
    } else {
        Some(CollectionError {
            total: uris.len(),
            failures,
        })
    };

    Ok(Batch { slots, error })
}

/// Walk the collection at `uri` and fetch every member as `T`.
#[instrument(skip(client), fields(shape = std::any::type_name::<T>()))]
pub async fn fetch_collection<T: Resource>(client: &ApiClient, uri: &str) -> Result<Batch<T>> {
    let members = member_uris(client, uri).await?;
    fetch_many(client, &members).await
}

/// Result of a fan-out read.
#[derive(Debug)]
pub struct Batch<T> {
    slots: Vec<Option<T>>,
    error: Option<CollectionError>,
}

impl<T> Batch<T> {
    /// One slot per requested URI, `None` where the fetch failed.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Resource fetched for the URI at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of requested URIs.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Failures, present only when at least one fetch failed.
    pub fn error(&self) -> Option<&CollectionError> {
        self.error.as_ref()
    }

    /// Whether every URI was fetched.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Successfully fetched resources, in input order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn into_parts(self) -> (Vec<Option<T>>, Option<CollectionError>) {
        (self.slots, self.error)
    }

    /// Successfully fetched resources, dropping any failures.
    pub fn into_resources(self) -> Vec<T> {
        self.slots.into_iter().flatten().collect()
    }

    /// All resources, or the collection error if anything failed.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(error) => Err(RedfishError::Collection(error)),
            None => Ok(self.slots.into_iter().flatten().collect()),
        }
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}

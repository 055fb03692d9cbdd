// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collection walker: member URIs across `Members@odata.nextLink` pages.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::client::ApiClient;
use crate::error::{RedfishError, Result};
use crate::odata::Links;

#[derive(Debug, Deserialize)]
struct CollectionPage {
    #[serde(rename = "Members", default)]
    members: Links,
    #[serde(rename = "Members@odata.count", default)]
    count: Option<u64>,
    #[serde(rename = "Members@odata.nextLink", default)]
    next_link: Option<String>,
}

/// Page-by-page iterator over a collection's member URIs.
///
/// A page whose next-link points back to a page already walked ends the
/// walk with [`RedfishError::LoopDetected`] on the following call.
pub struct CollectionWalker<'a> {
    client: &'a ApiClient,
    next: Option<String>,
    visited: HashSet<String>,
    count_hint: Option<u64>,
    emitted: usize,
}

impl<'a> CollectionWalker<'a> {
    pub fn new(client: &'a ApiClient, uri: impl Into<String>) -> Self {
        Self {
            client,
            next: Some(uri.into()),
            visited: HashSet::new(),
            count_hint: None,
            emitted: 0,
        }
    }

    /// `Members@odata.count` from the first page, once it was fetched.
    pub fn count_hint(&self) -> Option<u64> {
        self.count_hint
    }

    /// Member URIs emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Fetch the next page. `None` once the last page was walked.
    ///
    /// Pages with no members but a next-link are valid and yield an empty vec.
    pub async fn next_page(&mut self) -> Result<Option<Vec<String>>> {
        let uri = match self.next.take() {
            Some(uri) => uri,
            None => return Ok(None),
        };

        if !self.visited.insert(uri.clone()) {
            return Err(RedfishError::LoopDetected { uri });
        }

        let response = self.client.get(&uri).await?;
        let page: CollectionPage =
            serde_json::from_slice(&response.body).map_err(|e| RedfishError::decode(&uri, e))?;

        if self.visited.len() == 1 {
            self.count_hint = page.count;
        }

        self.next = page.next_link.filter(|link| !link.is_empty());
        self.emitted += page.members.len();

        debug!(
            page = %uri,
            members = page.members.len(),
            has_next = self.next.is_some(),
            "Walked collection page"
        );

        Ok(Some(page.members.into_vec()))
    }

    /// Walk every remaining page and concatenate the members.
    pub async fn collect(mut self) -> Result<Vec<String>> {
        let mut members = Vec::new();
        while let Some(page) = self.next_page().await? {
            members.extend(page);
        }

        if let Some(expected) = self.count_hint {
            if expected != members.len() as u64 {
                warn!(
                    expected,
                    actual = members.len(),
                    "Collection member count does not match Members@odata.count"
                );
            }
        }

        Ok(members)
    }
}

/// Every member URI of the collection at `uri`, in server order.
#[instrument(skip(client))]
pub async fn member_uris(client: &ApiClient, uri: &str) -> Result<Vec<String>> {
    CollectionWalker::new(client, uri).collect().await
}

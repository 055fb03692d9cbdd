// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Redfish Core
//!
//! Typed navigation and mutation of a Redfish resource graph over any
//! [`Transport`].
//!
//! This crate holds the engine shared by every resource shape:
//! - Reference decoding ([`Link`], [`Links`]) and embedded-or-referenced members
//! - Fetching single resources, bounded concurrent fan-out and paged collections
//! - Minimal-diff updates with `If-Match` concurrency control ([`commit`])
//! - Action dispatch ([`invoke`]) and task-monitor polling ([`TaskMonitor`])
//! - The error taxonomy ([`RedfishError`]) with the service's registry messages
//!
//! # Architecture
//!
//! Every fetched resource carries the [`ApiClient`] it came through and, for
//! shapes with writable properties, the raw bytes of the response. Links are
//! stored as URIs and only followed on request. Cancellation is ambient: all
//! I/O observes the client's cancellation token.
//!
//! # Example
//!
//! ```no_run
//! use redfish_core::{ApiClient, Entity, ReqwestTransport, TransportConfig, commit, fetch};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Chassis {
//!     #[serde(flatten)]
//!     entity: Entity,
//!     #[serde(rename = "AssetTag", default)]
//!     asset_tag: Option<String>,
//! }
//! redfish_core::resource!(Chassis, ["AssetTag"]);
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(
//!     TransportConfig::new("https://bmc.example.com").with_basic_auth("admin", "secret"),
//! )?;
//! let client = ApiClient::new(transport);
//!
//! let mut chassis: Chassis = fetch(&client, "/redfish/v1/Chassis/1").await?;
//! chassis.asset_tag = Some("rack-12".to_string());
//! commit(&mut chassis).await?;
//! # Ok(())
//! # }
//! ```

mod action;
mod client;
mod collection;
mod config;
mod embedded;
mod entity;
mod error;
mod fetch;
mod message;
mod odata;
mod task;
pub mod tolerant;
mod update;

pub use action::{ActionResponse, ActionTarget, Actions, invoke};
pub use client::ApiClient;
pub use collection::{CollectionWalker, member_uris};
pub use config::ClientConfig;
pub use embedded::{EmbeddedOrReferenced, resolve_all};
pub use entity::{Entity, Resource};
pub use error::{CollectionError, ItemFailure, RedfishError, Result};
pub use fetch::{Batch, fetch, fetch_collection, fetch_many};
pub use message::{Message, decode_error_messages};
pub use odata::{Link, Links, ODATA_ID, check_count, decode_references};
pub use task::{Task, TaskMonitor, TaskState};
pub use update::{CommitOutcome, commit, diff};

pub use redfish_http::{
    Credentials, HttpResponse, ReqwestTransport, ResponseHeaders, RetryAfter, Transport,
    TransportConfig, TransportError,
};

/// Well-known URI of the service root.
pub const SERVICE_ROOT: &str = "/redfish/v1/";

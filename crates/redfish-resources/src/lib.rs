// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Redfish Resources
//!
//! Typed shapes for the commonly used parts of the Redfish and Swordfish
//! resource graph, built on `redfish-core`.
//!
//! Every shape embeds an [`Entity`](redfish_core::Entity), implements
//! [`Resource`](redfish_core::Resource) and exposes its links as accessor
//! methods that fetch on demand through the client the shape was fetched
//! with. Shapes with writable properties can be mutated in place and saved
//! with [`commit`](redfish_core::commit).
//!
//! # Example
//!
//! ```no_run
//! use redfish_core::{ApiClient, ReqwestTransport, TransportConfig, commit};
//! use redfish_resources::{ResetType, ServiceRoot};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(TransportConfig::from_env()?)?;
//! let client = ApiClient::new(transport);
//!
//! let root = ServiceRoot::fetch(&client).await?;
//! for mut system in root.systems().await?.into_result()? {
//!     system.set_boot_override("Pxe", "Once");
//!     commit(&mut system).await?;
//!     system.reset(ResetType::ForceRestart).await?.finish().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod chassis;
mod common;
mod drive;
mod fabric;
mod processor;
mod service_root;
mod storage;
mod system;
mod task_service;
mod volume;

pub use chassis::{Chassis, ChassisLinks};
pub use common::{IndicatorLed, PowerState, Status};
pub use drive::{Drive, DriveLinks};
pub use fabric::{ConnectedEntity, Endpoint, Fabric, Zone, ZoneLinks};
pub use processor::Processor;
pub use service_root::ServiceRoot;
pub use storage::{Storage, StorageController};
pub use system::{Boot, ComputerSystem, ResetType, SystemLinks};
pub use task_service::TaskService;
pub use volume::{InitializeType, Volume, VolumeLinks};

pub use redfish_core::{Task, TaskMonitor, TaskState};

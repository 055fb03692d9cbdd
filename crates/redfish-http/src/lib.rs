// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP transport capability for the redfish client.
//!
//! The engine in `redfish-core` never talks to an HTTP library directly. It
//! consumes the narrow [`Transport`] trait defined here:
//!
//! - `get(uri)`
//! - `post(uri, body)`
//! - `patch(uri, body, if_match)`
//! - `delete(uri)`
//!
//! each returning an [`HttpResponse`] with the status code, case-insensitive
//! headers and the body bytes. [`ReqwestTransport`] is the native backend.
//!
//! # Example
//!
//! ```no_run
//! use redfish_http::{ReqwestTransport, Transport, TransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TransportConfig::new("https://bmc.example.com")
//!     .with_basic_auth("admin", "secret")
//!     .with_skip_cert_verification(true);
//! let transport = ReqwestTransport::new(config)?;
//!
//! let response = transport.get("/redfish/v1/").await?;
//! println!("status: {}", response.status);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod headers;
mod reqwest_transport;
mod transport;

pub use config::{Credentials, TransportConfig};
pub use error::{Result, TransportError};
pub use headers::{ResponseHeaders, RetryAfter};
pub use reqwest_transport::ReqwestTransport;
pub use transport::{HttpResponse, Transport};

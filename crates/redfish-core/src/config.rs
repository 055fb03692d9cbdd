// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Engine configuration.

use std::env;
use std::time::Duration;

use crate::error::{RedfishError, Result};

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Maximum number of concurrent GETs issued by a fan-out read (default: 8).
    pub fetch_concurrency: usize,
    /// Delay between task-monitor polls when the service sends no
    /// `Retry-After` and the caller set no interval (default: 10s).
    pub task_poll_floor: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: 8,
            task_poll_floor: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REDFISH_FETCH_CONCURRENCY`: Fan-out concurrency limit (default: 8)
    /// - `REDFISH_TASK_POLL_FLOOR_MS`: Task-monitor poll floor in milliseconds (default: 10000)
    pub fn from_env() -> Result<Self> {
        let fetch_concurrency: usize = env::var("REDFISH_FETCH_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|e| RedfishError::Config(format!("invalid REDFISH_FETCH_CONCURRENCY: {}", e)))?;

        if fetch_concurrency == 0 {
            return Err(RedfishError::Config(
                "REDFISH_FETCH_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let task_poll_floor_ms: u64 = env::var("REDFISH_TASK_POLL_FLOOR_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| {
                RedfishError::Config(format!("invalid REDFISH_TASK_POLL_FLOOR_MS: {}", e))
            })?;

        Ok(Self {
            fetch_concurrency,
            task_poll_floor: Duration::from_millis(task_poll_floor_ms),
        })
    }

    /// Set the fan-out concurrency limit. Values below 1 are raised to 1.
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    /// Set the task-monitor poll floor.
    pub fn with_task_poll_floor(mut self, floor: Duration) -> Self {
        self.task_poll_floor = floor;
        self
    }
}

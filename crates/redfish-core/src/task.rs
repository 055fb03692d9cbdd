// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task monitor: drives an asynchronous operation to its terminal response.
//!
//! A service answers a long-running request with `202 Accepted`, a
//! `Location` header naming the task monitor and optionally `Retry-After`.
//! [`TaskMonitor::wait`] polls the monitor until it stops answering 202 and
//! returns that final response, publishing every intermediate [`Task`]
//! snapshot to an optional status channel.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use redfish_http::{HttpResponse, RetryAfter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::entity::Entity;
use crate::error::{RedfishError, Result};
use crate::message::Message;

// Deadline used when a server delay does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    New,
    Starting,
    Running,
    Suspended,
    Interrupted,
    Pending,
    Stopping,
    Completed,
    Killed,
    Exception,
    Service,
    UserIntervention,
    Cancelling,
    Cancelled,
    /// A state this library does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether the task will make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Killed | TaskState::Exception | TaskState::Cancelled
        )
    }
}

/// Snapshot of a server task, as served by the task service or returned in
/// the body of a 202 from a task monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "TaskState", default)]
    pub task_state: TaskState,
    /// Health of the task (`OK`, `Warning`, `Critical`).
    #[serde(rename = "TaskStatus", default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    #[serde(rename = "PercentComplete", default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u32>,
    #[serde(rename = "StartTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "Messages", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    /// URI of the monitor for this task.
    #[serde(rename = "TaskMonitor", default, skip_serializing_if = "Option::is_none")]
    pub task_monitor: Option<String>,
}
crate::resource!(Task);

impl Task {
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.start_time.as_deref())
    }

    pub fn ended_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.end_time.as_deref())
    }

    /// A monitor for this task, when the service advertises one.
    pub fn monitor(&self) -> Result<Option<TaskMonitor>> {
        let client = self.entity.client()?;
        Ok(self
            .task_monitor
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .map(|uri| TaskMonitor::new(client.clone(), uri)))
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
}

/// Handle to an asynchronous operation in progress.
///
/// Delay before each poll:
/// - the last `Retry-After` from the service, raised to the caller's poll
///   interval when one was set
/// - otherwise the caller's poll interval
/// - otherwise `ClientConfig::task_poll_floor`
///
/// A `Retry-After` applies only to the poll that follows the response
/// carrying it.
#[derive(Debug)]
pub struct TaskMonitor {
    client: ApiClient,
    uri: String,
    retry_after: Option<RetryAfter>,
    poll_interval: Option<Duration>,
    status: Option<mpsc::Sender<Task>>,
}

impl TaskMonitor {
    /// Monitor the given URI.
    pub fn new(client: ApiClient, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
            retry_after: None,
            poll_interval: None,
            status: None,
        }
    }

    /// Monitor named by a `202 Accepted` response's `Location` header.
    ///
    /// Returns `None` for any other response.
    pub fn from_response(client: &ApiClient, response: &HttpResponse) -> Option<Self> {
        if !response.is_accepted() {
            return None;
        }
        let location = response.headers.location().filter(|l| !l.is_empty())?;
        Some(Self {
            retry_after: response.headers.retry_after(),
            ..Self::new(client.clone(), location)
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Delay hint for the next poll.
    pub fn retry_after(&self) -> Option<RetryAfter> {
        self.retry_after
    }

    pub fn with_retry_after(mut self, retry_after: RetryAfter) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Minimum time between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Publish each intermediate task snapshot to `sender`.
    ///
    /// Snapshots arrive in receipt order. The sender is dropped when the
    /// wait returns, which closes the channel.
    pub fn with_status_channel(mut self, sender: mpsc::Sender<Task>) -> Self {
        self.status = Some(sender);
        self
    }

    fn next_delay(&self, retry_after: Option<RetryAfter>) -> Duration {
        match (retry_after.map(|r| r.delay()), self.poll_interval) {
            (Some(server), Some(caller)) => server.max(caller),
            (Some(server), None) => server,
            (None, Some(caller)) => caller,
            (None, None) => self.client.config().task_poll_floor,
        }
    }

    /// Poll until the monitor returns a terminal response.
    ///
    /// A 2xx other than 202 is returned as is. A non-2xx status is mapped to
    /// the matching error. Cancellation is observed during every wait and
    /// request; no poll is issued after it fires.
    #[instrument(skip(self), fields(monitor = %self.uri))]
    pub async fn wait(self) -> Result<HttpResponse> {
        let mut retry_after = self.retry_after;
        let mut polls = 0u32;

        loop {
            let delay = self.next_delay(retry_after);
            debug!(delay_ms = delay.as_millis() as u64, "Waiting before next poll");
            self.client.sleep_until(deadline_after(delay)).await?;

            let response = self.client.get(&self.uri).await?;
            polls += 1;

            if !response.is_accepted() {
                debug!(status = response.status, polls, "Task reached terminal response");
                return Ok(response);
            }

            retry_after = response.headers.retry_after();

            let snapshot = if response.has_body() {
                match response.json::<Task>() {
                    Ok(task) => Some(task),
                    Err(e) => {
                        debug!(error = %e, "Ignoring undecodable task snapshot");
                        None
                    }
                }
            } else {
                None
            };

            if let Some(task) = snapshot {
                debug!(
                    state = ?task.task_state,
                    percent = task.percent_complete,
                    "Task in progress"
                );
                self.publish(task).await?;
            }
        }
    }

    async fn publish(&self, task: Task) -> Result<()> {
        let Some(sender) = &self.status else {
            return Ok(());
        };
        tokio::select! {
            biased;
            _ = self.client.cancellation_token().cancelled() => Err(RedfishError::Cancelled),
            sent = sender.send(task) => {
                if sent.is_err() {
                    debug!("Status receiver dropped");
                }
                Ok(())
            }
        }
    }

    /// Poll to completion and decode the terminal body as `T`.
    pub async fn wait_for_object<T: DeserializeOwned>(self) -> Result<T> {
        let uri = self.uri.clone();
        let response = self.wait().await?;
        if !response.has_body() {
            return Err(RedfishError::decode(&uri, "terminal response has no body"));
        }
        response.json().map_err(|e| RedfishError::decode(&uri, e))
    }

    /// Ask the service to cancel the task by deleting its monitor.
    #[instrument(skip(self), fields(monitor = %self.uri))]
    pub async fn cancel(&self) -> Result<()> {
        self.client.delete(&self.uri).await?;
        Ok(())
    }
}

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_state_is_tolerated() {
        let task: Task = serde_json::from_value(json!({
            "@odata.id": "/redfish/v1/TaskService/Tasks/1",
            "Id": "1",
            "TaskState": "Reticulating",
            "PercentComplete": 40
        }))
        .unwrap();
        assert_eq!(task.task_state, TaskState::Unknown);
        assert!(!task.task_state.is_terminal());
        assert_eq!(task.percent_complete, Some(40));
    }

    #[test]
    fn test_decode_every_state() {
        let states = [
            ("New", TaskState::New),
            ("Starting", TaskState::Starting),
            ("Running", TaskState::Running),
            ("Suspended", TaskState::Suspended),
            ("Interrupted", TaskState::Interrupted),
            ("Pending", TaskState::Pending),
            ("Stopping", TaskState::Stopping),
            ("Completed", TaskState::Completed),
            ("Killed", TaskState::Killed),
            ("Exception", TaskState::Exception),
            ("Service", TaskState::Service),
            ("UserIntervention", TaskState::UserIntervention),
            ("Cancelling", TaskState::Cancelling),
            ("Cancelled", TaskState::Cancelled),
        ];
        for (name, expected) in states {
            let task: Task =
                serde_json::from_value(json!({"Id": "1", "TaskState": name})).unwrap();
            assert_eq!(task.task_state, expected, "{}", name);
        }
        assert!(!TaskState::UserIntervention.is_terminal());
    }

    #[test]
    fn test_deadline_saturates_on_huge_delay() {
        let before = Instant::now();
        let deadline = deadline_after(Duration::from_secs(u64::MAX));
        assert!(deadline >= before + Duration::from_secs(86_400));
    }

    #[test]
    fn test_terminal_states() {
        for state in [
            TaskState::Completed,
            TaskState::Killed,
            TaskState::Exception,
            TaskState::Cancelled,
        ] {
            assert!(state.is_terminal(), "{:?}", state);
        }
        assert!(!TaskState::Running.is_terminal());
        assert!(!TaskState::Cancelling.is_terminal());
    }

    #[test]
    fn test_timestamps() {
        let task = Task {
            start_time: Some("2024-03-01T10:00:00+01:00".to_string()),
            end_time: Some("not a date".to_string()),
            ..Task::default()
        };
        assert_eq!(
            task.started_at().map(|t| t.to_rfc3339()),
            Some("2024-03-01T10:00:00+01:00".to_string())
        );
        assert!(task.ended_at().is_none());
    }

    #[test]
    fn test_detached_task_has_no_monitor() {
        let task = Task {
            task_monitor: Some("/redfish/v1/TaskMonitors/1".to_string()),
            ..Task::default()
        };
        assert!(matches!(task.monitor(), Err(RedfishError::NotSupported(_))));
    }
}

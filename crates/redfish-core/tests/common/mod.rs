// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for redfish-core integration tests.
//!
//! Provides an in-memory scripted transport that records every request, and
//! a few resource shapes exercising the engine.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redfish_core::{ApiClient, ClientConfig, Entity, HttpResponse, Links, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

/// A request seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub uri: String,
    pub body: Option<Value>,
    pub if_match: Option<String>,
    pub at: Instant,
}

struct Route {
    delay: Duration,
    response: HttpResponse,
}

#[derive(Default)]
struct State {
    routes: HashMap<(&'static str, String), VecDeque<Route>>,
    requests: Vec<Recorded>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Transport answering from per-(method, URI) scripts.
///
/// Responses for a route are served in order; the last one repeats.
/// Unscripted requests get a 404.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &'static str, uri: &str, response: HttpResponse) -> &Self {
        self.on_delayed(method, uri, Duration::ZERO, response)
    }

    pub fn on_delayed(
        &self,
        method: &'static str,
        uri: &str,
        delay: Duration,
        response: HttpResponse,
    ) -> &Self {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry((method, uri.to_string()))
            .or_default()
            .push_back(Route { delay, response });
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, uri: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.uri == uri)
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.clone())
    }

    pub fn client_with(&self, config: ClientConfig) -> ApiClient {
        ApiClient::with_config(Arc::new(self.clone()), config)
    }

    async fn serve(
        &self,
        method: &'static str,
        uri: &str,
        body: Option<Bytes>,
        if_match: Option<&str>,
    ) -> HttpResponse {
        let (delay, response) = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(Recorded {
                method,
                uri: uri.to_string(),
                body: body.and_then(|b| serde_json::from_slice(&b).ok()),
                if_match: if_match.map(str::to_string),
                at: Instant::now(),
            });
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);

            match state.routes.get_mut(&(method, uri.to_string())) {
                Some(queue) if queue.len() > 1 => {
                    let route = queue.pop_front().unwrap();
                    (route.delay, route.response)
                }
                Some(queue) if !queue.is_empty() => {
                    let route = &queue[0];
                    (route.delay, route.response.clone())
                }
                _ => (Duration::ZERO, HttpResponse::new(404, Bytes::new())),
            }
        };

        let _guard = InFlight(Arc::clone(&self.state));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

struct InFlight(Arc<Mutex<State>>);

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.lock() {
            state.in_flight -= 1;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, uri: &str) -> redfish_http::Result<HttpResponse> {
        Ok(self.serve("GET", uri, None, None).await)
    }

    async fn post(&self, uri: &str, body: Bytes) -> redfish_http::Result<HttpResponse> {
        Ok(self.serve("POST", uri, Some(body), None).await)
    }

    async fn patch(
        &self,
        uri: &str,
        body: Bytes,
        if_match: Option<&str>,
    ) -> redfish_http::Result<HttpResponse> {
        Ok(self.serve("PATCH", uri, Some(body), if_match).await)
    }

    async fn delete(&self, uri: &str) -> redfish_http::Result<HttpResponse> {
        Ok(self.serve("DELETE", uri, None, None).await)
    }
}

/// JSON response with the given status.
pub fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, serde_json::to_vec(&body).unwrap())
}

/// Bodiless response with the given status.
pub fn empty(status: u16) -> HttpResponse {
    HttpResponse::new(status, Bytes::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "ZoneType", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(rename = "Endpoints", default)]
    pub endpoints: Links,
}
redfish_core::resource!(Zone, ["Endpoints"]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveLinks {
    #[serde(rename = "Volumes", default)]
    pub volumes: Links,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "AssetTag", default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(rename = "IndicatorLED", default, skip_serializing_if = "Option::is_none")]
    pub indicator_led: Option<String>,
    #[serde(rename = "CapacityBytes", default, skip_serializing_if = "Option::is_none")]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "Links", default)]
    pub links: DriveLinks,
}
redfish_core::resource!(Drive, ["AssetTag", "IndicatorLED"]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "Reading", default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<f64>,
}
redfish_core::resource!(Sensor);

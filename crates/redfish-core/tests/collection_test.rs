// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for the collection walker.

mod common;

use common::{ScriptedTransport, Sensor, reply};
use redfish_core::{CollectionWalker, RedfishError, fetch_collection, member_uris};
use serde_json::{Value, json};

fn page(members: &[&str], count: Option<u64>, next: Option<&str>) -> Value {
    let mut body = json!({
        "@odata.id": "/redfish/v1/Chassis/1/Sensors",
        "Name": "Sensor Collection",
        "Members": members.iter().map(|m| json!({"@odata.id": m})).collect::<Vec<_>>(),
    });
    if let Some(count) = count {
        body["Members@odata.count"] = json!(count);
    }
    if let Some(next) = next {
        body["Members@odata.nextLink"] = json!(next);
    }
    body
}

#[tokio::test]
async fn test_pages_concatenate_in_order() {
    let transport = ScriptedTransport::new();
    transport.on(
        "GET",
        "/redfish/v1/Chassis/1/Sensors",
        reply(200, page(&["/s/1", "/s/2"], Some(5), Some("/redfish/v1/Chassis/1/Sensors?$skip=2"))),
    );
    transport.on(
        "GET",
        "/redfish/v1/Chassis/1/Sensors?$skip=2",
        reply(200, page(&["/s/3", "/s/4"], None, Some("/redfish/v1/Chassis/1/Sensors?$skip=4"))),
    );
    transport.on(
        "GET",
        "/redfish/v1/Chassis/1/Sensors?$skip=4",
        reply(200, page(&["/s/5"], None, None)),
    );

    let uris = member_uris(&transport.client(), "/redfish/v1/Chassis/1/Sensors")
        .await
        .unwrap();

    assert_eq!(uris, vec!["/s/1", "/s/2", "/s/3", "/s/4", "/s/5"]);
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_empty_page_with_next_link_continues() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/c", reply(200, page(&[], None, Some("/c?page=2"))));
    transport.on("GET", "/c?page=2", reply(200, page(&["/s/1"], None, None)));

    let client = transport.client();
    let mut walker = CollectionWalker::new(&client, "/c");

    assert_eq!(walker.next_page().await.unwrap(), Some(vec![]));
    assert_eq!(walker.next_page().await.unwrap(), Some(vec!["/s/1".to_string()]));
    assert_eq!(walker.next_page().await.unwrap(), None);
    assert_eq!(walker.emitted(), 1);
}

#[tokio::test]
async fn test_paging_cycle_is_detected() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/c", reply(200, page(&["/s/1"], None, Some("/c?page=2"))));
    transport.on("GET", "/c?page=2", reply(200, page(&["/s/2"], None, Some("/c"))));

    let result = member_uris(&transport.client(), "/c").await;

    match result {
        Err(RedfishError::LoopDetected { uri }) => assert_eq!(uri, "/c"),
        other => panic!("expected loop detection, got {:?}", other),
    }
    assert_eq!(transport.count("GET", "/c"), 1);
    assert_eq!(transport.count("GET", "/c?page=2"), 1);
}

#[tokio::test]
async fn test_count_mismatch_is_not_an_error() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/c", reply(200, page(&["/s/1"], Some(3), None)));

    let client = transport.client();
    let mut walker = CollectionWalker::new(&client, "/c");
    walker.next_page().await.unwrap();
    assert_eq!(walker.count_hint(), Some(3));

    let uris = member_uris(&client, "/c").await.unwrap();
    assert_eq!(uris, vec!["/s/1"]);
}

#[tokio::test]
async fn test_missing_collection_fails() {
    let transport = ScriptedTransport::new();
    let err = member_uris(&transport.client(), "/nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fetch_collection_resolves_members() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/c", reply(200, page(&["/s/1", "/s/2"], Some(2), None)));
    transport.on("GET", "/s/1", reply(200, json!({"@odata.id": "/s/1", "Reading": 20.0})));
    transport.on("GET", "/s/2", reply(200, json!({"@odata.id": "/s/2", "Reading": 21.0})));

    let sensors = fetch_collection::<Sensor>(&transport.client(), "/c")
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let readings: Vec<_> = sensors.iter().filter_map(|s| s.reading).collect();
    assert_eq!(readings, vec![20.0, 21.0]);
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for minimal-diff commits.

mod common;

use common::{Drive, ScriptedTransport, Sensor, Zone, empty, reply};
use redfish_core::{CommitOutcome, Links, RedfishError, commit, fetch};
use serde_json::{Value, json};

fn drive(asset_tag: &str) -> Value {
    json!({
        "@odata.id": "/D/1",
        "Id": "1",
        "AssetTag": asset_tag,
        "IndicatorLED": "Off",
        "CapacityBytes": 1024
    })
}

#[tokio::test]
async fn test_unmutated_commit_sends_nothing() {
    let transport = ScriptedTransport::new();
    transport.on(
        "GET",
        "/Z/1",
        reply(200, json!({
            "@odata.id": "/Z/1",
            "Id": "1",
            "ZoneType": "ZoneOfEndpoints",
            "Endpoints": [{"@odata.id": "/E/1"}]
        })),
    );
    let client = transport.client();

    let mut zone: Zone = fetch(&client, "/Z/1").await.unwrap();
    let outcome = commit(&mut zone).await.unwrap();

    assert!(outcome.is_unchanged());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_minimal_patch_with_if_match() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")).with_header("ETag", "\"abc\""));
    transport.on("PATCH", "/D/1", empty(204).with_header("ETag", "\"def\""));
    let client = transport.client();

    let mut drive: Drive = fetch(&client, "/D/1").await.unwrap();
    drive.asset_tag = Some("new".to_string());
    // Not writable: must not be sent.
    drive.capacity_bytes = Some(2048);

    let outcome = commit(&mut drive).await.unwrap();
    assert!(matches!(outcome, CommitOutcome::Applied));

    let patch = &transport.requests()[1];
    assert_eq!(patch.method, "PATCH");
    assert_eq!(patch.uri, "/D/1");
    assert_eq!(patch.body, Some(json!({"AssetTag": "new"})));
    assert_eq!(patch.if_match.as_deref(), Some("\"abc\""));

    assert_eq!(drive.entity.etag.as_deref(), Some("\"def\""));
    assert!(commit(&mut drive).await.unwrap().is_unchanged());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_patch_key_set_equals_changed_fields() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")));
    transport.on("PATCH", "/D/1", empty(204));
    let client = transport.client();

    let mut drive: Drive = fetch(&client, "/D/1").await.unwrap();
    drive.asset_tag = Some("new".to_string());
    drive.indicator_led = Some("Blinking".to_string());
    commit(&mut drive).await.unwrap();

    let patch = &transport.requests()[1];
    assert_eq!(
        patch.body,
        Some(json!({"AssetTag": "new", "IndicatorLED": "Blinking"}))
    );
    assert_eq!(patch.if_match, None);
}

#[tokio::test]
async fn test_response_body_refreshes_resource() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")));
    let mut updated = drive("NEW");
    updated["@odata.etag"] = json!("W/\"2\"");
    transport.on("PATCH", "/D/1", reply(200, updated));
    let client = transport.client();

    let mut drive: Drive = fetch(&client, "/D/1").await.unwrap();
    drive.asset_tag = Some("new".to_string());
    commit(&mut drive).await.unwrap();

    assert_eq!(drive.asset_tag.as_deref(), Some("NEW"));
    assert_eq!(drive.entity.etag.as_deref(), Some("W/\"2\""));
    assert!(drive.entity.is_attached());
    assert!(commit(&mut drive).await.unwrap().is_unchanged());
}

#[tokio::test]
async fn test_precondition_failure_then_refetch_succeeds() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")).with_header("ETag", "\"v1\""));
    transport.on("GET", "/D/1", reply(200, drive("other")).with_header("ETag", "\"v2\""));
    transport.on(
        "PATCH",
        "/D/1",
        reply(412, json!({"error": {"code": "Base.1.8.PreconditionFailed", "message": "stale"}})),
    );
    transport.on("PATCH", "/D/1", empty(204));
    let client = transport.client();

    let mut stale: Drive = fetch(&client, "/D/1").await.unwrap();
    stale.asset_tag = Some("new".to_string());
    let err = commit(&mut stale).await.unwrap_err();
    assert!(err.is_precondition_failed());
    assert_eq!(err.messages()[0].message_id, "Base.1.8.PreconditionFailed");

    let mut fresh: Drive = fetch(&client, "/D/1").await.unwrap();
    fresh.asset_tag = Some("new".to_string());
    assert!(matches!(commit(&mut fresh).await.unwrap(), CommitOutcome::Applied));

    let patches: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.method == "PATCH")
        .collect();
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[0].if_match.as_deref(), Some("\"v1\""));
    assert_eq!(patches[1].if_match.as_deref(), Some("\"v2\""));
}

#[tokio::test]
async fn test_bad_request_surfaces_messages() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")));
    transport.on(
        "PATCH",
        "/D/1",
        reply(400, json!({"error": {
            "code": "Base.1.8.GeneralError",
            "message": "See ExtendedInfo",
            "@Message.ExtendedInfo": [{
                "MessageId": "Base.1.8.PropertyValueNotInList",
                "Message": "The value Purple for the property IndicatorLED is not in the list of acceptable values.",
                "MessageArgs": ["Purple", "IndicatorLED"],
                "RelatedProperties": ["#/IndicatorLED"]
            }]
        }})),
    );
    let client = transport.client();

    let mut drive: Drive = fetch(&client, "/D/1").await.unwrap();
    drive.indicator_led = Some("Purple".to_string());
    let err = commit(&mut drive).await.unwrap_err();

    assert!(matches!(err, RedfishError::BadRequest { .. }));
    let detail = err
        .messages()
        .iter()
        .find(|m| m.key() == Some("PropertyValueNotInList"))
        .unwrap();
    assert_eq!(detail.message_args, vec!["Purple", "IndicatorLED"]);
    assert_eq!(detail.related_properties, vec!["#/IndicatorLED"]);
}

#[tokio::test]
async fn test_accepted_update_returns_monitor() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/Z/1", reply(200, json!({"@odata.id": "/Z/1", "Endpoints": []})));
    transport.on(
        "PATCH",
        "/Z/1",
        empty(202)
            .with_header("Location", "/redfish/v1/TaskService/TaskMonitors/7")
            .with_header("Retry-After", "5"),
    );
    let client = transport.client();

    let mut zone: Zone = fetch(&client, "/Z/1").await.unwrap();
    zone.endpoints = Links::from_iter(["/E/1", "/E/2"]);
    let monitor = commit(&mut zone).await.unwrap().into_monitor().unwrap();

    assert_eq!(monitor.uri(), "/redfish/v1/TaskService/TaskMonitors/7");
    assert_eq!(
        transport.requests()[1].body,
        Some(json!({"Endpoints": [{"@odata.id": "/E/1"}, {"@odata.id": "/E/2"}]}))
    );
}

#[tokio::test]
async fn test_read_only_shape_commit_is_noop() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/S/1", reply(200, json!({"Reading": 1.0})));
    let client = transport.client();

    let mut sensor: Sensor = fetch(&client, "/S/1").await.unwrap();
    sensor.reading = Some(2.0);
    assert!(commit(&mut sensor).await.unwrap().is_unchanged());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_deleted_resource_is_not_found() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/D/1", reply(200, drive("old")));
    transport.on("PATCH", "/D/1", empty(404));
    let client = transport.client();

    let mut drive: Drive = fetch(&client, "/D/1").await.unwrap();
    drive.asset_tag = Some("new".to_string());
    assert!(commit(&mut drive).await.unwrap_err().is_not_found());
}

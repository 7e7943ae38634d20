//! HTTP tests for assets, specializations, hosting and components.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_server(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/assets",
        json!({
            "name": name,
            "serial_number": format!("SN-{name}"),
            "kind": { "asset_type": "server", "model": "R740" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_get_asset_with_specialization(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/assets",
        json!({
            "name": "edge-fw",
            "serial_number": "SN-FW-1",
            "management_ip": "192.168.0.1",
            "kind": { "asset_type": "securitydevice", "sub_type": "firewall", "model": "PA-440" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["asset_type"], "securitydevice");
    assert_eq!(created["data"]["status"], "online");

    let json = body_json(get(build_test_app(pool), &format!("/api/v1/assets/{id}")).await).await;
    assert_eq!(json["data"]["name"], "edge-fw");
    assert_eq!(json["data"]["management_ip"], "192.168.0.1");
    assert_eq!(json["data"]["specialization"]["asset_type"], "securitydevice");
    assert_eq!(json["data"]["specialization"]["model"], "PA-440");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_serial_returns_409(pool: PgPool) {
    create_server(&pool, "web-01").await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/assets",
        json!({
            "name": "web-02",
            "serial_number": "SN-web-01",
            "kind": { "asset_type": "software" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_KEY");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_manufacturer_returns_422(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/assets",
        json!({
            "name": "orphan",
            "serial_number": "SN-O",
            "manufacturer_id": 9999,
            "kind": { "asset_type": "software" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_asset_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/assets/4242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(build_test_app(pool), "/api/v1/assets/4242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_update_is_logged(pool: PgPool) {
    let id = create_server(&pool, "db-01").await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{id}"),
        json!({ "status": "offline" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "offline");

    let events = body_json(
        get(build_test_app(pool), &format!("/api/v1/assets/{id}/events")).await,
    )
    .await;
    let events = events["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_type"], "offline");
    assert_eq!(events[1]["event_type"], "change");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_events_follow_actual_changes(pool: PgPool) {
    let id = create_server(&pool, "db-02").await;
    let uri = format!("/api/v1/assets/{id}");

    // Already online: no status event, only a plain change.
    for status in ["online", "standby", "faulty"] {
        let response =
            put_json(build_test_app(pool.clone()), &uri, json!({ "status": status })).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let events = body_json(
        get(build_test_app(pool), &format!("/api/v1/assets/{id}/events")).await,
    )
    .await;
    let types: Vec<&str> = events["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["maintenance", "maintenance", "change", "change"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_clears_nullable_asset_fields(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/business-units",
        json!({ "name": "Finance" }),
    )
    .await;
    let unit = body_json(response).await["data"]["id"].as_i64().unwrap();
    let id = create_server(&pool, "erp-01").await;
    let uri = format!("/api/v1/assets/{id}");

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "business_unit_id": unit, "memo": "ledger" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["business_unit_id"], unit);

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "business_unit_id": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["business_unit_id"].is_null());
    assert_eq!(json["data"]["memo"], "ledger");

    let json = body_json(get(build_test_app(pool), &uri).await).await;
    assert!(json["data"]["business_unit_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_type(pool: PgPool) {
    create_server(&pool, "srv").await;
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/assets",
        json!({
            "name": "office",
            "serial_number": "SN-OFFICE",
            "kind": { "asset_type": "software" },
        }),
    )
    .await;

    let json = body_json(
        get(build_test_app(pool), "/api/v1/assets?asset_type=software").await,
    )
    .await;
    let assets = json["data"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "office");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn component_attach_and_detach(pool: PgPool) {
    let id = create_server(&pool, "host").await;
    let other = create_server(&pool, "other").await;
    let uri = format!("/api/v1/assets/{id}/components");
    let ram = json!({ "kind": "ram", "slot_number": "A1", "size_gb": 32 });

    let response = post_json(build_test_app(pool.clone()), &uri, ram.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let component = body_json(response).await;
    assert_eq!(component["data"]["kind"], "ram");
    let component_id = component["data"]["id"].as_i64().unwrap();

    let response = post_json(build_test_app(pool.clone()), &uri, ram).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "UNIQUE_CONSTRAINT");

    // Detaching through another asset's path is refused.
    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{other}/components/ram/{component_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{id}/components/ram/{component_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed = body_json(get(build_test_app(pool.clone()), &uri).await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());

    let events = body_json(
        get(build_test_app(pool), &format!("/api/v1/assets/{id}/events")).await,
    )
    .await;
    let types: Vec<_> = events["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["hardware_change", "component_added", "change"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hosting_cycle_returns_422(pool: PgPool) {
    let host = create_server(&pool, "hv").await;
    let guest = create_server(&pool, "vm").await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{guest}/host"),
        json!({ "host_asset_id": host }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["host_asset_id"], host);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{host}/host"),
        json!({ "host_asset_id": guest }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");

    let hosted = body_json(
        get(build_test_app(pool), &format!("/api/v1/servers/{host}/hosted")).await,
    )
    .await;
    let hosted = hosted["data"].as_array().unwrap();
    assert_eq!(hosted.len(), 1);
    assert_eq!(hosted[0]["asset_id"], guest);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn specialization_update_checks_type(pool: PgPool) {
    let id = create_server(&pool, "srv").await;
    let uri = format!("/api/v1/assets/{id}/specialization");

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "asset_type": "server", "os_name": "Debian" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["os_name"], "Debian");

    let response = put_json(
        build_test_app(pool),
        &uri,
        json!({ "asset_type": "storagedevice", "model": "FAS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_keeps_event_history(pool: PgPool) {
    let id = create_server(&pool, "gone").await;

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get(build_test_app(pool), "/api/v1/events").await).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_type"], "other");
    assert!(events[0]["detail"].as_str().unwrap().contains("SN-gone"));
    assert!(events.iter().all(|e| e["asset_id"].is_null()));
}

//! HTTP tests for reference data, software and users.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create(pool: &PgPool, uri: &str, body: serde_json::Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), uri, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manufacturer_crud(pool: PgPool) {
    let id = create(&pool, "/api/v1/manufacturers", json!({ "name": "Cisco" })).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/manufacturers",
        json!({ "name": "Cisco" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/manufacturers/{id}"),
        json!({ "telephone": "+1-800-553-6387" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Cisco");
    assert_eq!(json["data"]["telephone"], "+1-800-553-6387");

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/manufacturers/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/v1/manufacturers/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn data_center_delete_removes_its_assets(pool: PgPool) {
    let dc = create(&pool, "/api/v1/data-centers", json!({ "name": "FRA1" })).await;
    let asset = create(
        &pool,
        "/api/v1/assets",
        json!({
            "name": "rack-switch",
            "serial_number": "SN-RS",
            "data_center_id": dc,
            "kind": { "asset_type": "networkdevice" },
        }),
    )
    .await;

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/data-centers/{dc}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/v1/assets/{asset}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn business_unit_children(pool: PgPool) {
    let root = create(&pool, "/api/v1/business-units", json!({ "name": "Engineering" })).await;
    let child = create(
        &pool,
        "/api/v1/business-units",
        json!({ "name": "Platform", "parent_id": root }),
    )
    .await;

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/business-units/{root}/children"),
        )
        .await,
    )
    .await;
    let children = json["data"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["id"], child);

    // Moving the root under its own child is rejected.
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/business-units/{root}"),
        json!({ "parent_id": child }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // An explicit null detaches the child; an absent field leaves it alone.
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/business-units/{child}"),
        json!({ "memo": "platform team" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["parent_id"], root);
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/business-units/{child}"),
        json!({ "parent_id": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["parent_id"].is_null());
    assert_eq!(json["data"]["memo"], "platform team");

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/business-units/{root}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(
        get(build_test_app(pool), &format!("/api/v1/business-units/{child}")).await,
    )
    .await;
    assert!(json["data"]["parent_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_with_inverted_dates_returns_400(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/contracts",
        json!({
            "serial_number": "C-1",
            "name": "Support",
            "start_date": "2025-06-01",
            "end_date": "2025-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tags_software_and_users(pool: PgPool) {
    let tag = create(&pool, "/api/v1/tags", json!({ "name": "prod" })).await;
    let response = get(build_test_app(pool.clone()), &format!("/api/v1/tags/{tag}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let software = create(
        &pool,
        "/api/v1/software",
        json!({ "version": "Windows Server 2022", "license_count": 10 }),
    )
    .await;
    let json = body_json(
        get(build_test_app(pool.clone()), &format!("/api/v1/software/{software}")).await,
    )
    .await;
    assert_eq!(json["data"]["license_count"], 10);

    let user = create(&pool, "/api/v1/users", json!({ "username": "alice" })).await;
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/users/{user}"),
        json!({ "username": "alice.ops" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["username"], "alice.ops");

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/users/{user}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete(build_test_app(pool), &format!("/api/v1/users/{user}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

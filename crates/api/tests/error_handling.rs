//! `AppError` to HTTP response mapping. No server or database needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use cmdb_api::error::AppError;
use cmdb_core::error::CoreError;
use cmdb_db::DbError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::not_found("Asset", 42))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Entity not found: Asset 42");
}

#[tokio::test]
async fn duplicate_key_returns_409() {
    let err = AppError::Core(CoreError::DuplicateKey {
        entity: "Asset",
        field: "serial_number",
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn unique_constraint_returns_409() {
    let err = AppError::Core(CoreError::UniqueConstraint {
        component: "RAM",
        constraint: "uq_rams_asset_slot".into(),
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "UNIQUE_CONSTRAINT");
}

#[tokio::test]
async fn already_approved_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::AlreadyApproved { id: 7 })).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_APPROVED");
    assert_eq!(json["error"], "Approval entry 7 is already approved");
}

#[tokio::test]
async fn invalid_reference_returns_422() {
    let err = AppError::Core(CoreError::InvalidReference("hosting cycle".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn validation_returns_400() {
    let err = AppError::Core(CoreError::Validation("name must not be blank".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Validation failed: name must not be blank");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad kind".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad kind");
}

#[tokio::test]
async fn database_error_returns_500_and_hides_detail() {
    let err = AppError::from(DbError::Database(sqlx::Error::PoolTimedOut));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn db_core_error_keeps_its_status() {
    let err = AppError::from(DbError::Core(CoreError::not_found("Tag", 3)));
    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

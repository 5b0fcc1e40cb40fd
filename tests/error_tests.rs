// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use guild_board::error::AppError;

#[test]
fn test_only_database_errors_are_retryable() {
    assert!(AppError::Database("deadline exceeded".to_string()).is_retryable());

    assert!(!AppError::NotFound("post".to_string()).is_retryable());
    assert!(!AppError::PermissionDenied("nope".to_string()).is_retryable());
    assert!(!AppError::InvalidOperation("self like".to_string()).is_retryable());
    assert!(!AppError::Internal(anyhow::anyhow!("boom")).is_retryable());
}

#[test]
fn test_status_mapping() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
        (AppError::PermissionDenied("x".to_string()), StatusCode::FORBIDDEN),
        (AppError::InvalidOperation("x".to_string()), StatusCode::CONFLICT),
        (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
        (AppError::Database("x".to_string()), StatusCode::SERVICE_UNAVAILABLE),
    ];

    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[tokio::test]
async fn test_internal_details_not_exposed() {
    let response = AppError::Database("connection string with secret".to_string()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let response = AppError::NotFound("Post abc not found".to_string()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "Post abc not found");
}

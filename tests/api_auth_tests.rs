// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication, admin gating and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept bearer and cookie sessions
//! 3. Admin routes reject non-admin members
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use guild_board::db::UserStore;
use guild_board::middleware::auth::AUTH_COOKIE;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{authed_request, create_test_app, create_test_jwt, json_body, seed_user};

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_first_request_registers_member() {
    let (app, _, db) = create_test_app();

    let response = app
        .oneshot(authed_request("GET", "/api/me", "newbie", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["uid"], "newbie");
    assert_eq!(body["points"], 0);
    assert_eq!(body["tier"], "bronze");
    assert_eq!(body["next_tier"], "silver");
    assert_eq!(body["points_to_next_tier"], 100);
    assert!(db.get_user("newbie").await.unwrap().is_some());
}

#[tokio::test]
async fn test_cookie_session_accepted() {
    let (app, _, _) = create_test_app();
    let token = create_test_jwt("cookie-user");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::COOKIE, format!("{}={}", AUTH_COOKIE, token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_members() {
    let (app, _, db) = create_test_app();
    seed_user(&db, "member", 0).await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/admin/users", "member", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/member/points",
            "member",
            Some(json!({ "delta": 1000 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(db.get_user("member").await.unwrap().unwrap().points, 0);
}

#[tokio::test]
async fn test_admin_adjusts_points_with_numeric_string() {
    let (app, state, db) = create_test_app();
    seed_user(&db, "boss", 0).await;
    seed_user(&db, "member", 0).await;
    state.admin.set_admin_flag("boss", true).await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/member/points",
            "boss",
            Some(json!({ "delta": "150" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["points"], 150);
    assert_eq!(body["tier"], "silver");

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/member/points",
            "boss",
            Some(json!({ "delta": "lots" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(db.get_user("member").await.unwrap().unwrap().points, 150);
}

#[tokio::test]
async fn test_admin_cannot_delete_admin_over_http() {
    let (app, state, db) = create_test_app();
    seed_user(&db, "boss", 0).await;
    seed_user(&db, "deputy", 0).await;
    state.admin.set_admin_flag("boss", true).await.unwrap();
    state.admin.set_admin_flag("deputy", true).await.unwrap();

    let response = app
        .oneshot(authed_request("DELETE", "/api/admin/users/deputy", "boss", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/posts")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gallery API tests: members browse, only admins change the gallery.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{authed_request, create_test_app, json_body, seed_user};

fn upload() -> serde_json::Value {
    json!({
        "title": "Spring LAN party",
        "description": "Finals on the big screen",
        "image_url": "https://cdn.example.com/lan.jpg",
    })
}

#[tokio::test]
async fn test_member_cannot_add_gallery_image() {
    let (app, state, db) = create_test_app();
    seed_user(&db, "member", 0).await;

    let response = app
        .oneshot(authed_request("POST", "/api/admin/gallery", "member", Some(upload())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(state.gallery.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_adds_and_members_list() {
    let (app, state, db) = create_test_app();
    seed_user(&db, "boss", 0).await;
    seed_user(&db, "member", 0).await;
    state.admin.set_admin_flag("boss", true).await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/admin/gallery", "boss", Some(upload())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/gallery", "member", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Spring LAN party");

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/admin/gallery/{}", id),
            "member",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/admin/gallery/{}", id),
            "boss",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.gallery.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gallery_upload_requires_valid_url() {
    let (app, state, db) = create_test_app();
    seed_user(&db, "boss", 0).await;
    state.admin.set_admin_flag("boss", true).await.unwrap();

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/admin/gallery",
            "boss",
            Some(json!({ "title": "No link", "image_url": "not a url" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

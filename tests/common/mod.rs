// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use guild_board::config::Config;
use guild_board::db::{FirestoreDb, MemoryDb, UserStore};
use guild_board::middleware::auth::create_jwt;
use guild_board::models::{Principal, User};
use guild_board::routes::create_router;
use guild_board::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Identity used to mint test sessions.
#[allow(dead_code)]
pub fn principal(uid: &str) -> Principal {
    Principal {
        uid: uid.to_string(),
        email: format!("{}@example.com", uid),
        display_name: format!("Player {}", uid),
        photo_url: None,
    }
}

/// Insert a member with the given points, returning the stored record.
#[allow(dead_code)]
pub async fn seed_user(db: &MemoryDb, uid: &str, points: u64) -> User {
    let mut user = User::new(&principal(uid), chrono::Utc::now());
    user.points = points;
    user.refresh_tier();
    db.create_user(&user).await.expect("Failed to seed user")
}

/// Create a test app on an in-memory store.
/// Returns the router, the shared state and the store for direct inspection.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryDb>) {
    let db = Arc::new(MemoryDb::new());
    let state = Arc::new(AppState::new(Config::test_default(), db.clone()));
    (create_router(state.clone()), state, db)
}

/// Session token for `uid` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str) -> String {
    let config = Config::test_default();
    create_jwt(&principal(uid), &config.jwt_signing_key).expect("Failed to create JWT")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn authed_request(
    method: &str,
    uri: &str,
    uid: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", create_test_jwt(uid)));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

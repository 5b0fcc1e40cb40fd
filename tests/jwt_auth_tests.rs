// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session tests.
//!
//! Tokens minted by the identity gateway must decode in the auth middleware,
//! so the claim layout is pinned here independently of `create_jwt`.

use guild_board::error::AppError;
use guild_board::middleware::auth::{create_jwt, verify_jwt, Claims};
use guild_board::models::Principal;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn principal() -> Principal {
    Principal {
        uid: "google-oauth2|12345".to_string(),
        email: "gamer@university.edu".to_string(),
        display_name: "Gamer".to_string(),
        photo_url: None,
    }
}

/// Token built the way the identity gateway builds it.
fn gateway_token(sub: &str, exp: usize) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "email": "gamer@university.edu",
        "name": "Gamer",
        "iat": now(),
        "exp": exp,
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

#[test]
fn test_gateway_token_accepted_without_picture() {
    let token = gateway_token("google-oauth2|12345", now() + 3600);
    let identity = verify_jwt(&token, SIGNING_KEY).expect("Gateway token should verify");
    assert_eq!(identity, principal());
}

#[test]
fn test_expired_token_rejected() {
    // Well past the default leeway
    let token = gateway_token("google-oauth2|12345", now() - 3600);
    let err = verify_jwt(&token, SIGNING_KEY).unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[test]
fn test_empty_subject_rejected() {
    let token = gateway_token("", now() + 3600);
    assert!(matches!(
        verify_jwt(&token, SIGNING_KEY),
        Err(AppError::InvalidToken)
    ));
}

#[test]
fn test_jwt_expiration_is_future() {
    let token = create_jwt(&principal(), SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually
    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    // Token should expire at least 29 days in the future
    assert!(
        token_data.claims.exp > now() + 86400 * 29,
        "Token expiration should be ~30 days in the future"
    );
    assert_eq!(token_data.claims.sub, principal().uid);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Session tokens are issued by the identity gateway and carry the member's
//! identity-provider profile, so the first authenticated request can register
//! the member without another lookup.

use crate::error::AppError;
use crate::models::Principal;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const AUTH_COOKIE: &str = "guild_token";

const SESSION_LIFETIME_SECS: usize = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity-provider uid)
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn uid(&self) -> &str {
        &self.0.uid
    }
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(AUTH_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(AppError::Unauthorized),
        }
    };

    let principal = verify_jwt(&token, &state.config.jwt_signing_key)?;
    request.extensions_mut().insert(AuthUser(principal));

    Ok(next.run(request).await)
}

/// Validate a session token and return the identity it carries.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<Principal, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::InvalidToken
        })?
        .claims;

    if claims.sub.is_empty() {
        return Err(AppError::InvalidToken);
    }

    Ok(Principal {
        uid: claims.sub,
        email: claims.email,
        display_name: claims.name,
        photo_url: claims.picture,
    })
}

/// Create a JWT for a user session.
pub fn create_jwt(principal: &Principal, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: principal.uid.clone(),
        email: principal.email.clone(),
        name: principal.display_name.clone(),
        picture: principal.photo_url.clone(),
        iat: now,
        exp: now + SESSION_LIFETIME_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

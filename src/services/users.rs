// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member directory: registration, profile edits and listings.

use std::sync::Arc;

use chrono::Utc;

use crate::db::{user_fields, UserMutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Principal, ProfileUpdate, User};

const MAX_NICKNAME_CHARS: usize = 30;

#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserStore>,
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Load the caller's record, creating it on first sign-in.
    pub async fn ensure_user(&self, principal: &Principal) -> Result<User> {
        if let Some(user) = self.users.get_user(&principal.uid).await? {
            return Ok(user);
        }

        let user = self
            .users
            .create_user(&User::new(principal, Utc::now()))
            .await?;
        tracing::info!(uid = %user.uid, email = %user.email, "Registered new member");
        Ok(user)
    }

    /// Apply a self-service profile edit. Never touches points, tier or flags.
    pub async fn update_profile(&self, uid: &str, mut update: ProfileUpdate) -> Result<User> {
        if let Some(nickname) = update.nickname.take() {
            let nickname = nickname.trim();
            if nickname.is_empty() {
                return Err(AppError::BadRequest("Nickname is required".to_string()));
            }
            if nickname.chars().count() > MAX_NICKNAME_CHARS {
                return Err(AppError::BadRequest(format!(
                    "Nickname must be at most {} characters",
                    MAX_NICKNAME_CHARS
                )));
            }
            update.nickname = Some(nickname.to_string());
        }

        let mutation = UserMutation::new(&user_fields::PROFILE, move |user| update.apply_to(user));
        let user = self
            .users
            .update_user_atomic(uid, mutation)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;

        tracing::debug!(uid, "Profile updated");
        Ok(user)
    }

    /// Visible members (test accounts hidden), ordered by name.
    pub async fn members(&self) -> Result<Vec<User>> {
        let mut users = self.users.list_users().await?;
        users.retain(|u| !u.is_test_account);
        users.sort_by_cached_key(|u| (u.public_name().to_lowercase(), u.uid.clone()));
        Ok(users)
    }

    pub async fn public_profile(&self, uid: &str) -> Result<User> {
        self.users
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
    }
}

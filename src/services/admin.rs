// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative overrides on members, plus the reward log.
//!
//! Callers are expected to have verified that the acting user is an admin.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::db::{user_fields, PostStore, RewardStore, UserMutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Reward, User};
use crate::services::ledger::PointLedger;

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub total_users: usize,
    pub test_accounts: usize,
    pub admins: usize,
    pub challengers: usize,
    pub total_posts: usize,
    pub total_rewards: usize,
}

/// Parse a manual point adjustment given as a JSON number or numeric string.
pub fn parse_delta(raw: &Value) -> Result<i64> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::InvalidOperation(format!("Invalid point delta: {}", raw)))
}

#[derive(Clone)]
pub struct AdminOverride {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    rewards: Arc<dyn RewardStore>,
    ledger: PointLedger,
}

impl AdminOverride {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        rewards: Arc<dyn RewardStore>,
        ledger: PointLedger,
    ) -> Self {
        Self {
            users,
            posts,
            rewards,
            ledger,
        }
    }

    async fn update_flag(&self, uid: &str, mutation: UserMutation) -> Result<User> {
        self.users
            .update_user_atomic(uid, mutation)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
    }

    // ─── Member flags ────────────────────────────────────────────

    pub async fn set_admin_flag(&self, uid: &str, enabled: bool) -> Result<User> {
        let user = self
            .update_flag(
                uid,
                UserMutation::new(&[user_fields::IS_ADMIN], move |u| u.is_admin = enabled),
            )
            .await?;
        tracing::info!(uid, enabled, "Admin flag changed");
        Ok(user)
    }

    pub async fn set_test_account_flag(&self, uid: &str, enabled: bool) -> Result<User> {
        let user = self
            .update_flag(
                uid,
                UserMutation::new(&[user_fields::IS_TEST_ACCOUNT], move |u| {
                    u.is_test_account = enabled
                }),
            )
            .await?;
        tracing::info!(uid, enabled, "Test account flag changed");
        Ok(user)
    }

    /// Grant or revoke the challenger tier, writing the flag and tier together.
    ///
    /// Clearing the flag falls back to the point-derived tier.
    pub async fn set_challenger(&self, uid: &str, enabled: bool) -> Result<User> {
        let user = self
            .update_flag(
                uid,
                UserMutation::new(&[user_fields::IS_CHALLENGER, user_fields::TIER], move |u| {
                    u.is_challenger = enabled;
                    u.refresh_tier();
                }),
            )
            .await?;
        tracing::info!(uid, enabled, tier = ?user.tier, "Challenger flag changed");
        Ok(user)
    }

    /// Manual point adjustment through the ledger.
    pub async fn adjust_points(&self, uid: &str, delta: i64) -> Result<User> {
        let user = self
            .ledger
            .apply_delta(uid, delta)
            .await?
            .map(|entry| entry.user)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;
        tracing::info!(uid, delta, points = user.points, "Points adjusted by admin");
        Ok(user)
    }

    /// Remove a member record. Admins must be demoted first.
    ///
    /// Their posts and comments remain, carrying the frozen author snapshot.
    pub async fn delete_user(&self, uid: &str) -> Result<()> {
        let user = self
            .users
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;
        if user.is_admin {
            return Err(AppError::InvalidOperation(
                "Cannot delete an admin account".to_string(),
            ));
        }

        if !self.users.delete_user(uid).await? {
            return Err(AppError::NotFound(format!("User {} not found", uid)));
        }
        tracing::info!(uid, email = %user.email, "User deleted by admin");
        Ok(())
    }

    // ─── Listings ────────────────────────────────────────────────

    /// Every member including test accounts, highest points first.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let mut users = self.users.list_users().await?;
        users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.uid.cmp(&b.uid)));
        Ok(users)
    }

    pub async fn overview(&self) -> Result<AdminOverview> {
        let users = self.users.list_users().await?;
        let total_posts = self.posts.list_posts(None).await?.len();
        let total_rewards = self.rewards.list_rewards().await?.len();

        Ok(AdminOverview {
            total_users: users.len(),
            test_accounts: users.iter().filter(|u| u.is_test_account).count(),
            admins: users.iter().filter(|u| u.is_admin).count(),
            challengers: users.iter().filter(|u| u.is_challenger).count(),
            total_posts,
            total_rewards,
        })
    }

    // ─── Rewards ─────────────────────────────────────────────────

    pub async fn give_reward(
        &self,
        admin: &User,
        user_id: &str,
        reward_name: &str,
        description: &str,
    ) -> Result<Reward> {
        let reward_name = reward_name.trim();
        if reward_name.is_empty() {
            return Err(AppError::BadRequest("Reward name is required".to_string()));
        }
        let recipient = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let reward = Reward {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: recipient.uid.clone(),
            user_name: recipient.public_name().to_string(),
            reward_name: reward_name.to_string(),
            description: description.trim().to_string(),
            given_at: Utc::now(),
            given_by: admin.public_name().to_string(),
        };
        self.rewards.create_reward(&reward).await?;

        tracing::info!(
            reward_id = %reward.id,
            recipient = %reward.user_id,
            admin = %admin.uid,
            "Reward given"
        );
        Ok(reward)
    }

    pub async fn list_rewards(&self) -> Result<Vec<Reward>> {
        self.rewards.list_rewards().await
    }

    pub async fn delete_reward(&self, id: &str) -> Result<()> {
        if !self.rewards.delete_reward(id).await? {
            return Err(AppError::NotFound(format!("Reward {} not found", id)));
        }
        tracing::info!(reward_id = id, "Reward deleted");
        Ok(())
    }
}

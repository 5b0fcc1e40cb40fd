// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes: member overrides, reward log and dashboard counts.
//!
//! Every handler loads the acting member and rejects non-admins first.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Reward, TierType, User};
use crate::routes::api::current_user;
use crate::services::{parse_delta, AdminOverview};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/overview", get(get_overview))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{uid}", delete(delete_user))
        .route("/api/admin/users/{uid}/admin", put(set_admin))
        .route("/api/admin/users/{uid}/test-account", put(set_test_account))
        .route("/api/admin/users/{uid}/challenger", put(set_challenger))
        .route("/api/admin/users/{uid}/points", post(adjust_points))
        .route("/api/admin/rewards", get(list_rewards).post(give_reward))
        .route("/api/admin/rewards/{id}", delete(delete_reward))
}

/// Load the acting member and require the admin flag.
pub(crate) async fn require_admin(state: &AppState, auth: &AuthUser) -> Result<User> {
    let user = current_user(state, auth).await?;
    if !user.is_admin {
        tracing::warn!(uid = %user.uid, "Non-admin attempted admin operation");
        return Err(AppError::PermissionDenied("Admin access required".to_string()));
    }
    Ok(user)
}

// ─── Members ─────────────────────────────────────────────────

/// Admin view of a member, including flags and private fields.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminUserResponse {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub nickname: Option<String>,
    pub student_id: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub tier: TierType,
    pub is_admin: bool,
    pub is_challenger: bool,
    pub is_test_account: bool,
    pub created_at: String,
}

impl From<User> for AdminUserResponse {
    fn from(u: User) -> Self {
        Self {
            uid: u.uid,
            email: u.email,
            display_name: u.display_name,
            nickname: u.nickname,
            student_id: u.student_id,
            points: u.points,
            tier: u.tier,
            is_admin: u.is_admin,
            is_challenger: u.is_challenger,
            is_test_account: u.is_test_account,
            created_at: format_utc_rfc3339(u.created_at),
        }
    }
}

async fn get_overview(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AdminOverview>> {
    require_admin(&state, &auth).await?;
    Ok(Json(state.admin.overview().await?))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<AdminUserResponse>>> {
    require_admin(&state, &auth).await?;
    let users = state.admin.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
struct FlagRequest {
    enabled: bool,
}

async fn set_admin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<AdminUserResponse>> {
    let admin = require_admin(&state, &auth).await?;
    if uid == admin.uid && !body.enabled {
        return Err(AppError::InvalidOperation(
            "Cannot remove your own admin access".to_string(),
        ));
    }
    let user = state.admin.set_admin_flag(&uid, body.enabled).await?;
    Ok(Json(user.into()))
}

async fn set_test_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<AdminUserResponse>> {
    require_admin(&state, &auth).await?;
    let user = state.admin.set_test_account_flag(&uid, body.enabled).await?;
    Ok(Json(user.into()))
}

async fn set_challenger(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<AdminUserResponse>> {
    require_admin(&state, &auth).await?;
    let user = state.admin.set_challenger(&uid, body.enabled).await?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
struct AdjustPointsRequest {
    /// Accepted as a JSON number or a numeric string
    delta: serde_json::Value,
}

async fn adjust_points(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(body): Json<AdjustPointsRequest>,
) -> Result<Json<AdminUserResponse>> {
    let admin = require_admin(&state, &auth).await?;
    let delta = parse_delta(&body.delta)?;
    tracing::info!(admin = %admin.uid, target = %uid, delta, "Manual point adjustment");
    let user = state.admin.adjust_points(&uid, delta).await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
) -> Result<StatusCode> {
    let admin = require_admin(&state, &auth).await?;
    tracing::info!(admin = %admin.uid, target = %uid, "Admin-initiated user deletion");
    state.admin.delete_user(&uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Rewards ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RewardResponse {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub reward_name: String,
    pub description: String,
    pub given_at: String,
    pub given_by: String,
}

impl From<Reward> for RewardResponse {
    fn from(r: Reward) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user_name: r.user_name,
            reward_name: r.reward_name,
            description: r.description,
            given_at: format_utc_rfc3339(r.given_at),
            given_by: r.given_by,
        }
    }
}

#[derive(Deserialize, Validate)]
struct GiveRewardRequest {
    #[validate(length(min = 1))]
    user_id: String,
    #[validate(length(min = 1, max = 100))]
    reward_name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    description: String,
}

async fn list_rewards(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<RewardResponse>>> {
    require_admin(&state, &auth).await?;
    let rewards = state.admin.list_rewards().await?;
    Ok(Json(rewards.into_iter().map(Into::into).collect()))
}

async fn give_reward(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<GiveRewardRequest>,
) -> Result<(StatusCode, Json<RewardResponse>)> {
    body.validate()?;
    let admin = require_admin(&state, &auth).await?;
    let reward = state
        .admin
        .give_reward(&admin, &body.user_id, &body.reward_name, &body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(reward.into())))
}

async fn delete_reward(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_admin(&state, &auth).await?;
    state.admin.delete_reward(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

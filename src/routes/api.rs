// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for member profiles, tiers and the ranking.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::tier::{points_to_next_tier, progress_fraction};
use crate::models::{ProfileUpdate, TierType, User};
use crate::routes::posts::PostResponse;
use crate::services::RankingEntry;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const MAX_RANKING_LIMIT: usize = 100;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).patch(update_me))
        .route("/api/members", get(get_members))
        .route("/api/users/{uid}", get(get_user_profile))
        .route("/api/users/{uid}/posts", get(get_user_posts))
        .route("/api/tiers", get(get_tiers))
        .route("/api/ranking", get(get_ranking))
}

/// Load (or register) the member behind the session.
pub(crate) async fn current_user(state: &AppState, auth: &AuthUser) -> Result<User> {
    state.users.ensure_user(&auth.0).await
}

// ─── User Profile ────────────────────────────────────────────

/// Public view of a member.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberResponse {
    pub uid: String,
    pub display_name: String,
    pub nickname: Option<String>,
    pub photo_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub tier: TierType,
    pub is_challenger: bool,
    pub introduction: Option<String>,
    pub favorite_game: Option<String>,
    pub lol_nickname: Option<String>,
    pub main_position: Option<String>,
    pub created_at: String,
}

impl From<User> for MemberResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            display_name: user.display_name,
            nickname: user.nickname,
            photo_url: user.photo_url,
            points: user.points,
            tier: user.tier,
            is_challenger: user.is_challenger,
            introduction: user.introduction,
            favorite_game: user.favorite_game,
            lol_nickname: user.lol_nickname,
            main_position: user.main_position,
            created_at: format_utc_rfc3339(user.created_at),
        }
    }
}

/// Current user response, including private fields and tier progress.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    #[serde(flatten)]
    pub member: MemberResponse,
    pub email: String,
    pub student_id: Option<String>,
    pub is_admin: bool,
    pub next_tier: Option<TierType>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub points_to_next_tier: Option<u64>,
    pub progress: f64,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email.clone(),
            student_id: user.student_id.clone(),
            is_admin: user.is_admin,
            next_tier: user.tier.next(),
            points_to_next_tier: points_to_next_tier(user.points, user.tier),
            progress: progress_fraction(user.points, user.tier),
            member: user.into(),
        }
    }
}

/// Get current user profile, registering the member on first visit.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(user.into()))
}

#[derive(Deserialize, Validate)]
struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 30))]
    nickname: String,
    #[validate(url)]
    photo_url: Option<String>,
    #[validate(length(max = 1000))]
    introduction: Option<String>,
    #[validate(length(max = 100))]
    favorite_game: Option<String>,
    #[validate(length(max = 20))]
    student_id: Option<String>,
    #[validate(length(max = 30))]
    lol_nickname: Option<String>,
    #[validate(length(max = 20))]
    main_position: Option<String>,
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>> {
    body.validate()?;
    current_user(&state, &auth).await?;

    let update = ProfileUpdate {
        nickname: Some(body.nickname),
        photo_url: body.photo_url,
        introduction: body.introduction,
        favorite_game: body.favorite_game,
        student_id: body.student_id,
        lol_nickname: body.lol_nickname,
        main_position: body.main_position,
    };
    let user = state.users.update_profile(auth.uid(), update).await?;
    Ok(Json(user.into()))
}

// ─── Members ─────────────────────────────────────────────────

async fn get_members(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MemberResponse>>> {
    let members = state.users.members().await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<MemberResponse>> {
    let user = state.users.public_profile(&uid).await?;
    Ok(Json(user.into()))
}

async fn get_user_posts(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<PostResponse>>> {
    let posts = state.posts.list_user_posts(&uid).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

// ─── Tiers ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TierResponse {
    pub tier: TierType,
    pub name: String,
    pub emoji: String,
    pub color: String,
    /// `None` for challenger, which is granted rather than earned
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub min_points: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub max_points: Option<u64>,
}

async fn get_tiers() -> Json<Vec<TierResponse>> {
    let tiers = TierType::ALL
        .into_iter()
        .map(|tier| {
            let info = tier.info();
            TierResponse {
                tier,
                name: info.name.to_string(),
                emoji: info.emoji.to_string(),
                color: info.color.to_string(),
                min_points: (tier != TierType::Challenger).then(|| tier.min_points()),
                max_points: tier.max_points(),
            }
        })
        .collect();
    Json(tiers)
}

// ─── Ranking ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RankingQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankingResponse {
    pub entries: Vec<RankingEntry>,
    /// The caller's own row, absent for test accounts
    pub me: Option<RankingEntry>,
}

async fn get_ranking(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<RankingResponse>> {
    let limit = params
        .limit
        .unwrap_or(state.config.ranking_limit)
        .clamp(1, MAX_RANKING_LIMIT);

    tracing::debug!(uid = auth.uid(), limit, "Fetching ranking");

    let entries = state.ranking.rank(limit).await?;
    let me = state.ranking.position_of(auth.uid()).await?;
    Ok(Json(RankingResponse { entries, me }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Board routes: posts, likes and comments.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Comment, Post, PostCategory, PostDraft, PostEdit, TierType};
use crate::routes::api::current_user;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(edit_post).delete(delete_post),
        )
        .route("/api/posts/{id}/like", post(toggle_like))
        .route("/api/posts/{id}/comments", post(add_comment))
        .route(
            "/api/posts/{id}/comments/{comment_id}",
            delete(delete_comment),
        )
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CommentResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_photo_url: Option<String>,
    pub author_tier: TierType,
    pub content: String,
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            author_id: c.author_id,
            author_name: c.author_name,
            author_photo_url: c.author_photo_url,
            author_tier: c.author_tier,
            content: c.content,
            created_at: format_utc_rfc3339(c.created_at),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_photo_url: Option<String>,
    pub author_tier: TierType,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category: PostCategory,
    pub likes: Vec<String>,
    pub like_count: usize,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            like_count: p.likes.len(),
            id: p.id,
            author_id: p.author_id,
            author_name: p.author_name,
            author_photo_url: p.author_photo_url,
            author_tier: p.author_tier,
            title: p.title,
            content: p.content,
            image_url: p.image_url,
            category: p.category,
            likes: p.likes,
            comments: p.comments.into_iter().map(Into::into).collect(),
            created_at: format_utc_rfc3339(p.created_at),
            updated_at: format_utc_rfc3339(p.updated_at),
        }
    }
}

// ─── Posts ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct PostsQuery {
    category: Option<PostCategory>,
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostsQuery>,
) -> Result<Json<Vec<PostResponse>>> {
    let posts = state.posts.list_posts(params.category).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>> {
    let post = state.posts.get_post(&id).await?;
    Ok(Json(post.into()))
}

#[derive(Deserialize, Validate)]
struct CreatePostRequest {
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[validate(length(min = 1, max = 10000))]
    content: String,
    category: PostCategory,
    #[validate(url)]
    image_url: Option<String>,
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    body.validate()?;
    let author = current_user(&state, &auth).await?;

    let draft = PostDraft {
        title: body.title,
        content: body.content,
        category: body.category,
        image_url: body.image_url,
    };
    let post = state.posts.create_post(&author, draft).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[derive(Deserialize, Validate)]
struct EditPostRequest {
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[validate(length(min = 1, max = 10000))]
    content: String,
    /// Omitted keeps the image, `null` removes it
    #[serde(default, deserialize_with = "deserialize_some")]
    image_url: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field.
fn deserialize_some<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

async fn edit_post(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<EditPostRequest>,
) -> Result<Json<PostResponse>> {
    body.validate()?;
    let actor = current_user(&state, &auth).await?;

    let edit = PostEdit {
        title: body.title,
        content: body.content,
        image_url: body.image_url,
    };
    let post = state.posts.edit_post(&actor, &id, edit).await?;
    Ok(Json(post.into()))
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let actor = current_user(&state, &auth).await?;
    state.posts.delete_post(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Likes & Comments ────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: usize,
}

async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    let actor = current_user(&state, &auth).await?;
    let outcome = state.posts.toggle_like(&actor, &id).await?;
    Ok(Json(LikeResponse {
        liked: outcome.liked,
        like_count: outcome.like_count,
    }))
}

#[derive(Deserialize, Validate)]
struct AddCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    content: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    body.validate()?;
    let author = current_user(&state, &auth).await?;
    let comment = state.posts.add_comment(&author, &id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let actor = current_user(&state, &auth).await?;
    state.posts.delete_comment(&actor, &id, &comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

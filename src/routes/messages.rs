// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Private message routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Message, TierType};
use crate::routes::api::current_user;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/messages", axum::routing::post(send_message))
        .route("/api/messages/received", get(list_received))
        .route("/api/messages/sent", get(list_sent))
        .route("/api/messages/unread-count", get(unread_count))
        .route("/api/messages/{id}", get(read_message).delete(delete_message))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_photo_url: Option<String>,
    pub sender_tier: TierType,
    pub receiver_id: String,
    pub receiver_name: String,
    pub title: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            sender_name: m.sender_name,
            sender_photo_url: m.sender_photo_url,
            sender_tier: m.sender_tier,
            receiver_id: m.receiver_id,
            receiver_name: m.receiver_name,
            title: m.title,
            content: m.content,
            is_read: m.is_read,
            created_at: format_utc_rfc3339(m.created_at),
        }
    }
}

#[derive(Deserialize, Validate)]
struct SendMessageRequest {
    #[validate(length(min = 1))]
    receiver_id: String,
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[validate(length(min = 1, max = 2000))]
    content: String,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    body.validate()?;
    let sender = current_user(&state, &auth).await?;
    let message = state
        .messages
        .send(&sender, &body.receiver_id, &body.title, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

async fn list_received(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MessageResponse>>> {
    let messages = state.messages.received(auth.uid()).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

async fn list_sent(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MessageResponse>>> {
    let messages = state.messages.sent(auth.uid()).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UnreadCountResponse {
    pub count: usize,
}

async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UnreadCountResponse>> {
    let count = state.messages.unread_count(auth.uid()).await?;
    Ok(Json(UnreadCountResponse { count }))
}

async fn read_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let message = state.messages.read(auth.uid(), &id).await?;
    Ok(Json(message.into()))
}

async fn delete_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.messages.delete(auth.uid(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gallery routes. Listing is open to members; changes are admin-only.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::GalleryImage;
use crate::routes::admin::require_admin;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gallery", get(list_images))
        .route("/api/admin/gallery", axum::routing::post(add_image))
        .route("/api/admin/gallery/{id}", delete(remove_image))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GalleryImageResponse {
    pub id: String,
    pub image_url: String,
    pub title: String,
    pub description: Option<String>,
    pub uploaded_by_name: String,
    pub created_at: String,
}

impl From<GalleryImage> for GalleryImageResponse {
    fn from(g: GalleryImage) -> Self {
        Self {
            id: g.id,
            image_url: g.image_url,
            title: g.title,
            description: g.description,
            uploaded_by_name: g.uploaded_by_name,
            created_at: format_utc_rfc3339(g.created_at),
        }
    }
}

async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryImageResponse>>> {
    let images = state.gallery.list().await?;
    Ok(Json(images.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize, Validate)]
struct AddImageRequest {
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[validate(length(max = 500))]
    description: Option<String>,
    #[validate(url)]
    image_url: String,
}

async fn add_image(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<GalleryImageResponse>)> {
    body.validate()?;
    let admin = require_admin(&state, &auth).await?;
    let image = state
        .gallery
        .add(&admin, &body.title, body.description.as_deref(), &body.image_url)
        .await?;
    Ok((StatusCode::CREATED, Json(image.into())))
}

async fn remove_image(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_admin(&state, &auth).await?;
    state.gallery.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

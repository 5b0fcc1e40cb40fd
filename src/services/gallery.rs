// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club photo gallery.

use std::sync::Arc;

use chrono::Utc;

use crate::db::GalleryStore;
use crate::error::{AppError, Result};
use crate::models::{GalleryImage, User};

#[derive(Clone)]
pub struct GalleryService {
    gallery: Arc<dyn GalleryStore>,
}

impl GalleryService {
    pub fn new(gallery: Arc<dyn GalleryStore>) -> Self {
        Self { gallery }
    }

    pub async fn list(&self) -> Result<Vec<GalleryImage>> {
        self.gallery.list_gallery_images().await
    }

    /// Record an uploaded photo. Admin only, checked by the caller.
    pub async fn add(
        &self,
        admin: &User,
        title: &str,
        description: Option<&str>,
        image_url: &str,
    ) -> Result<GalleryImage> {
        let (title, image_url) = (title.trim(), image_url.trim());
        if title.is_empty() || image_url.is_empty() {
            return Err(AppError::BadRequest(
                "Gallery title and image URL are required".to_string(),
            ));
        }

        let image = GalleryImage {
            id: uuid::Uuid::new_v4().to_string(),
            image_url: image_url.to_string(),
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            uploaded_by: admin.uid.clone(),
            uploaded_by_name: admin.public_name().to_string(),
            created_at: Utc::now(),
        };
        self.gallery.create_gallery_image(&image).await?;
        tracing::info!(image_id = %image.id, admin = %admin.uid, "Gallery image added");
        Ok(image)
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        if !self.gallery.delete_gallery_image(id).await? {
            return Err(AppError::NotFound(format!("Gallery image {} not found", id)));
        }
        tracing::info!(image_id = id, "Gallery image removed");
        Ok(())
    }
}

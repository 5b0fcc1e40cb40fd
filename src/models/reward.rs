//! Admin-issued reward records and gallery photos.
//!
//! Neither affects points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reward log entry (`rewards/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    /// Recipient uid
    pub user_id: String,
    /// Recipient name at time of award
    pub user_name: String,
    pub reward_name: String,
    #[serde(default)]
    pub description: String,
    pub given_at: DateTime<Utc>,
    /// Name of the issuing admin
    pub given_by: String,
}

/// Gallery photo record (`gallery/{id}`). The image itself lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub image_url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub uploaded_by: String,
    pub uploaded_by_name: String,
    pub created_at: DateTime<Utc>,
}

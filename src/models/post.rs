// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Board posts and their embedded comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::tier::TierType;
use crate::models::user::AuthorSnapshot;

/// Board a post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PostCategory {
    /// Self-introductions
    Introduction,
    /// Free board
    Free,
    /// Game recommendations
    Games,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Introduction => "introduction",
            PostCategory::Free => "free",
            PostCategory::Games => "games",
        }
    }
}

/// Post stored in Firestore (`posts/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Generated UUID (also used as document ID)
    pub id: String,
    pub author_id: String,
    /// Author name at time of posting
    pub author_name: String,
    pub author_photo_url: Option<String>,
    /// Author tier at time of posting (display only)
    pub author_tier: TierType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: PostCategory,
    /// Uids of members who liked the post, each at most once
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post with a frozen author snapshot and empty likes/comments.
    pub fn new(
        author: AuthorSnapshot,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: author.id,
            author_name: author.name,
            author_photo_url: author.photo_url,
            author_tier: author.tier,
            title: draft.title,
            content: draft.content,
            image_url: draft.image_url,
            category: draft.category,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_liked_by(&self, uid: &str) -> bool {
        self.likes.iter().any(|l| l == uid)
    }

    /// Add a like if absent. Returns `true` if the set changed.
    pub fn add_like(&mut self, uid: &str) -> bool {
        if self.is_liked_by(uid) {
            return false;
        }
        self.likes.push(uid.to_string());
        true
    }

    /// Remove a like if present. Returns `true` if the set changed.
    pub fn remove_like(&mut self, uid: &str) -> bool {
        let before = self.likes.len();
        self.likes.retain(|l| l != uid);
        self.likes.len() != before
    }

    pub fn find_comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Remove a comment by id, returning it if it was present.
    pub fn take_comment(&mut self, comment_id: &str) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }
}

/// User-supplied fields of a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub image_url: Option<String>,
}

/// Author edit of an existing post.
///
/// `image_url: Some(None)` clears the image, `None` keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEdit {
    pub title: String,
    pub content: String,
    pub image_url: Option<Option<String>>,
}

/// Comment embedded in a post. Not an independent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Generated UUID, the only key used for removal
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_photo_url: Option<String>,
    /// Commenter tier at time of commenting (display only)
    pub author_tier: TierType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: AuthorSnapshot, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: author.id,
            author_name: author.name,
            author_photo_url: author.photo_url,
            author_tier: author.tier,
            content,
            created_at: now,
        }
    }
}

/// Outcome of a like toggle, decided atomically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    /// `true` if the like was added, `false` if it was removed
    pub liked: bool,
    /// Post author, who receives (or loses) the like points
    pub author_id: String,
    pub like_count: usize,
}

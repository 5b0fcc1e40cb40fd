// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post lifecycle: content mutations paired with their point effects.
//!
//! Ordering rules:
//! - Creations and likes write content first, then the ledger. A ledger
//!   failure afterwards is logged as a discrepancy and returned.
//! - Deletions reverse the ledger first, then remove content. If the removal
//!   fails or the content is already gone, the points actually reversed are
//!   restored. A reversal clamped at zero restores only what it took.

use std::sync::Arc;

use chrono::Utc;

use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostCategory, PostDraft, PostEdit, User, POINT_VALUES};
use crate::services::ledger::PointLedger;

/// Outcome of a like toggle as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: usize,
}

/// Creates, edits and removes posts, comments and likes.
#[derive(Clone)]
pub struct PostLifecycle {
    posts: Arc<dyn PostStore>,
    ledger: PointLedger,
}

impl PostLifecycle {
    pub fn new(posts: Arc<dyn PostStore>, ledger: PointLedger) -> Self {
        Self { posts, ledger }
    }

    // ─── Queries ─────────────────────────────────────────────────

    pub async fn get_post(&self, id: &str) -> Result<Post> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    pub async fn list_posts(&self, category: Option<PostCategory>) -> Result<Vec<Post>> {
        self.posts.list_posts(category).await
    }

    pub async fn list_user_posts(&self, uid: &str) -> Result<Vec<Post>> {
        self.posts.list_posts_by_author(uid).await
    }

    // ─── Posts ───────────────────────────────────────────────────

    /// Publish a post and grant the author the category's points.
    pub async fn create_post(&self, author: &User, mut draft: PostDraft) -> Result<Post> {
        draft.title = required_title(&draft.title)?;
        require_content(&draft.content)?;
        let post = Post::new(author.snapshot(), draft, Utc::now());
        self.posts.create_post(&post).await?;

        let grant = POINT_VALUES.for_post(post.category);
        self.credit(&author.uid, grant, "create_post", &post.id)
            .await?;

        tracing::info!(
            post_id = %post.id,
            author = %author.uid,
            category = post.category.as_str(),
            grant,
            "Post created"
        );
        Ok(post)
    }

    /// Edit title, content or image. Only the author may edit; points are unaffected.
    pub async fn edit_post(&self, actor: &User, id: &str, mut edit: PostEdit) -> Result<Post> {
        edit.title = required_title(&edit.title)?;
        require_content(&edit.content)?;
        let post = self.get_post(id).await?;
        if post.author_id != actor.uid {
            return Err(AppError::PermissionDenied(
                "Only the author can edit this post".to_string(),
            ));
        }

        if !self.posts.edit_post(id, &edit, Utc::now()).await? {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }
        tracing::debug!(post_id = id, author = %actor.uid, "Post edited");
        self.get_post(id).await
    }

    /// Delete a post and reverse its creation grant from the author.
    ///
    /// Points granted for likes and comments on the post are not reversed.
    pub async fn delete_post(&self, actor: &User, id: &str) -> Result<()> {
        let post = self.get_post(id).await?;
        if post.author_id != actor.uid && !actor.is_admin {
            return Err(AppError::PermissionDenied(
                "Only the author or an admin can delete this post".to_string(),
            ));
        }

        let grant = POINT_VALUES.for_post(post.category);
        let reversed = self.reverse(&post.author_id, grant).await?;

        match self.posts.delete_post(id).await {
            Ok(Some(_)) => {
                tracing::info!(
                    post_id = id,
                    author = %post.author_id,
                    actor = %actor.uid,
                    reversed,
                    "Post deleted"
                );
                Ok(())
            }
            Ok(None) => {
                self.compensate(&post.author_id, reversed, "delete_post", id)
                    .await;
                Err(AppError::NotFound(format!("Post {} not found", id)))
            }
            Err(e) => {
                self.compensate(&post.author_id, reversed, "delete_post", id)
                    .await;
                Err(e)
            }
        }
    }

    // ─── Likes ───────────────────────────────────────────────────

    /// Like the post if the actor has not, otherwise unlike it.
    ///
    /// The post author gains or loses the like grant accordingly.
    pub async fn toggle_like(&self, actor: &User, id: &str) -> Result<LikeOutcome> {
        let post = self.get_post(id).await?;
        if post.author_id == actor.uid {
            return Err(AppError::InvalidOperation(
                "Cannot like your own post".to_string(),
            ));
        }

        let toggle = self
            .posts
            .toggle_like(id, &actor.uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

        let delta = if toggle.liked {
            POINT_VALUES.like_received
        } else {
            -POINT_VALUES.like_received
        };
        self.credit(&toggle.author_id, delta, "toggle_like", id)
            .await?;

        tracing::debug!(
            post_id = id,
            liker = %actor.uid,
            liked = toggle.liked,
            like_count = toggle.like_count,
            "Like toggled"
        );
        Ok(LikeOutcome {
            liked: toggle.liked,
            like_count: toggle.like_count,
        })
    }

    // ─── Comments ────────────────────────────────────────────────

    pub async fn add_comment(&self, author: &User, post_id: &str, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
        }

        let comment = Comment::new(author.snapshot(), content.to_string(), Utc::now());
        if !self.posts.add_comment(post_id, &comment).await? {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }

        self.credit(&author.uid, POINT_VALUES.comment, "add_comment", post_id)
            .await?;

        tracing::debug!(
            post_id,
            comment_id = %comment.id,
            author = %author.uid,
            "Comment added"
        );
        Ok(comment)
    }

    /// Remove a comment by id and reverse the comment grant from its author.
    pub async fn delete_comment(&self, actor: &User, post_id: &str, comment_id: &str) -> Result<()> {
        let post = self.get_post(post_id).await?;
        let comment = post
            .find_comment(comment_id)
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;
        if comment.author_id != actor.uid && !actor.is_admin {
            return Err(AppError::PermissionDenied(
                "Only the author or an admin can delete this comment".to_string(),
            ));
        }
        let author_id = comment.author_id.clone();

        let reversed = self.reverse(&author_id, POINT_VALUES.comment).await?;

        match self.posts.remove_comment(post_id, comment_id).await {
            Ok(Some(_)) => {
                tracing::debug!(post_id, comment_id, actor = %actor.uid, "Comment deleted");
                Ok(())
            }
            Ok(None) => {
                self.compensate(&author_id, reversed, "delete_comment", comment_id)
                    .await;
                Err(AppError::NotFound(format!("Comment {} not found", comment_id)))
            }
            Err(e) => {
                self.compensate(&author_id, reversed, "delete_comment", comment_id)
                    .await;
                Err(e)
            }
        }
    }

    // ─── Ledger helpers ──────────────────────────────────────────

    /// Apply a grant after content was already written.
    async fn credit(&self, uid: &str, delta: i64, operation: &'static str, target: &str) -> Result<()> {
        if let Err(e) = self.ledger.apply_delta(uid, delta).await {
            tracing::error!(
                uid,
                delta,
                operation,
                target,
                error = %e,
                "Ledger discrepancy: content written but points not applied"
            );
            return Err(e);
        }
        Ok(())
    }

    /// Take back `grant`, returning how many points were actually removed.
    async fn reverse(&self, uid: &str, grant: i64) -> Result<i64> {
        let entry = self.ledger.apply_delta(uid, -grant).await?;
        Ok(entry.map_or(0, |e| -e.applied))
    }

    /// Re-grant points reversed for a deletion that did not happen.
    async fn compensate(&self, uid: &str, delta: i64, operation: &'static str, target: &str) {
        if delta == 0 {
            return;
        }
        tracing::warn!(uid, delta, operation, target, "Compensating reversed points");
        if let Err(e) = self.ledger.apply_delta(uid, delta).await {
            tracing::error!(
                uid,
                delta,
                operation,
                target,
                error = %e,
                "Ledger discrepancy: compensation failed"
            );
        }
    }
}

/// Trimmed post title; blank titles are rejected.
fn required_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Post title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

fn require_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Post content cannot be empty".to_string()));
    }
    Ok(())
}

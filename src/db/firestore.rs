// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the store ports for:
//! - Users (profiles, points and tier)
//! - Posts (with embedded likes and comments)
//! - Messages, rewards and gallery records
//!
//! Every read-modify-write runs inside `run_transaction`: the document read
//! registers it for conflict detection, and the client retries the closure
//! with fresh data if another writer commits first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::errors::{BackoffError, FirestoreError};

use crate::db::{
    collections, newest_first, GalleryStore, MessageStore, PostStore, RewardStore,
    UserMutation, UserStore,
};
use crate::error::AppError;
use crate::models::{
    Comment, GalleryImage, LikeToggle, Message, MessageParty, Post, PostCategory, PostEdit,
    Reward, User,
};

type TxResult<T> = std::result::Result<T, BackoffError<FirestoreError>>;

const POST_EDIT_FIELDS: [&str; 4] = ["title", "content", "image_url", "updated_at"];
const POST_LIKE_FIELDS: [&str; 1] = ["likes"];
const POST_COMMENT_FIELDS: [&str; 1] = ["comments"];
const MESSAGE_DELETE_FIELDS: [&str; 2] = ["deleted_by_sender", "deleted_by_receiver"];

fn db_error(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(db_error)
    }

    async fn set_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Send + Sync,
    {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn list_all<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    async fn list_where_eq<T>(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let value = value.to_string();
        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field(field).eq(value.clone())]))
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    /// Delete a document inside a transaction, reporting whether it existed.
    async fn delete_existing<T>(&self, collection: &'static str, id: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send + 'static,
    {
        let id = id.to_string();
        self.client
            .run_transaction(|db, transaction| {
                let id = id.clone();
                Box::pin(async move {
                    let existing: Option<T> = db
                        .fluent()
                        .select()
                        .by_id_in(collection)
                        .obj()
                        .one(&id)
                        .await?;
                    if existing.is_some() {
                        db.fluent()
                            .delete()
                            .from(collection)
                            .document_id(&id)
                            .add_to_transaction(transaction)?;
                    }
                    Ok::<_, BackoffError<FirestoreError>>(existing)
                })
            })
            .await
            .map_err(db_error)
    }

    /// Read a post, let `f` mutate it and decide the result, then write back
    /// `fields`, all within one transaction. `f` returning `None` skips the write.
    async fn update_post_atomic<R, F>(
        &self,
        id: &str,
        fields: &'static [&'static str],
        f: F,
    ) -> Result<Option<R>, AppError>
    where
        R: Send + 'static,
        F: Fn(&mut Post) -> Option<R> + Send + Sync + 'static,
    {
        let id = id.to_string();
        let f = std::sync::Arc::new(f);
        self.client
            .run_transaction(|db, transaction| {
                let id = id.clone();
                let f = f.clone();
                Box::pin(async move {
                    let current: Option<Post> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::POSTS)
                        .obj()
                        .one(&id)
                        .await?;
                    let Some(mut post) = current else {
                        return Ok(None);
                    };
                    let Some(result) = f(&mut post) else {
                        return Ok(None);
                    };
                    db.fluent()
                        .update()
                        .fields(fields.iter().copied())
                        .in_col(collections::POSTS)
                        .document_id(&id)
                        .object(&post)
                        .add_to_transaction(transaction)?;
                    TxResult::Ok(Some(result))
                })
            })
            .await
            .map_err(db_error)
    }
}

// ─── User Operations ─────────────────────────────────────────

#[async_trait]
impl UserStore for FirestoreDb {
    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, uid).await
    }

    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let candidate = user.clone();
        self.client
            .run_transaction(|db, transaction| {
                let candidate = candidate.clone();
                Box::pin(async move {
                    let existing: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&candidate.uid)
                        .await?;
                    if let Some(existing) = existing {
                        return Ok(existing);
                    }
                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&candidate.uid)
                        .object(&candidate)
                        .add_to_transaction(transaction)?;
                    TxResult::Ok(candidate)
                })
            })
            .await
            .map_err(db_error)
    }

    async fn update_user_atomic(
        &self,
        uid: &str,
        mutation: UserMutation,
    ) -> Result<Option<User>, AppError> {
        let uid = uid.to_string();
        self.client
            .run_transaction(|db, transaction| {
                let uid = uid.clone();
                let mutation = mutation.clone();
                Box::pin(async move {
                    let current: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&uid)
                        .await?;
                    let Some(mut user) = current else {
                        return Ok(None);
                    };
                    mutation.apply(&mut user);
                    db.fluent()
                        .update()
                        .fields(mutation.fields().iter().copied())
                        .in_col(collections::USERS)
                        .document_id(&uid)
                        .object(&user)
                        .add_to_transaction(transaction)?;
                    TxResult::Ok(Some(user))
                })
            })
            .await
            .map_err(db_error)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.list_all(collections::USERS).await
    }

    async fn delete_user(&self, uid: &str) -> Result<bool, AppError> {
        let removed: Option<User> = self.delete_existing(collections::USERS, uid).await?;
        tracing::debug!(uid, existed = removed.is_some(), "Deleted user profile");
        Ok(removed.is_some())
    }
}

// ─── Post Operations ─────────────────────────────────────────

#[async_trait]
impl PostStore for FirestoreDb {
    async fn create_post(&self, post: &Post) -> Result<(), AppError> {
        self.set_doc(collections::POSTS, &post.id, post).await
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        self.get_doc(collections::POSTS, id).await
    }

    async fn list_posts(&self, category: Option<PostCategory>) -> Result<Vec<Post>, AppError> {
        let mut posts: Vec<Post> = match category {
            Some(c) => {
                self.list_where_eq(collections::POSTS, "category", c.as_str())
                    .await?
            }
            None => self.list_all(collections::POSTS).await?,
        };
        // Sorted client-side to avoid a composite index on (category, created_at)
        newest_first(&mut posts, |p| (p.created_at, p.id.as_str()));
        Ok(posts)
    }

    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>, AppError> {
        let mut posts: Vec<Post> = self
            .list_where_eq(collections::POSTS, "author_id", author_id)
            .await?;
        newest_first(&mut posts, |p| (p.created_at, p.id.as_str()));
        Ok(posts)
    }

    async fn edit_post(
        &self,
        id: &str,
        edit: &PostEdit,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let edit = edit.clone();
        let updated = self
            .update_post_atomic(id, &POST_EDIT_FIELDS, move |post| {
                post.title = edit.title.clone();
                post.content = edit.content.clone();
                if let Some(image_url) = &edit.image_url {
                    post.image_url = image_url.clone();
                }
                post.updated_at = now;
                Some(())
            })
            .await?;
        Ok(updated.is_some())
    }

    async fn delete_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        self.delete_existing(collections::POSTS, id).await
    }

    async fn toggle_like(&self, id: &str, uid: &str) -> Result<Option<LikeToggle>, AppError> {
        let uid = uid.to_string();
        self.update_post_atomic(id, &POST_LIKE_FIELDS, move |post| {
            let liked = if post.is_liked_by(&uid) {
                post.remove_like(&uid);
                false
            } else {
                post.add_like(&uid);
                true
            };
            Some(LikeToggle {
                liked,
                author_id: post.author_id.clone(),
                like_count: post.likes.len(),
            })
        })
        .await
    }

    async fn add_comment(&self, id: &str, comment: &Comment) -> Result<bool, AppError> {
        let comment = comment.clone();
        let added = self
            .update_post_atomic(id, &POST_COMMENT_FIELDS, move |post| {
                post.comments.push(comment.clone());
                Some(())
            })
            .await?;
        Ok(added.is_some())
    }

    async fn remove_comment(
        &self,
        id: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>, AppError> {
        let comment_id = comment_id.to_string();
        self.update_post_atomic(id, &POST_COMMENT_FIELDS, move |post| {
            post.take_comment(&comment_id)
        })
        .await
    }
}

// ─── Message Operations ──────────────────────────────────────

#[async_trait]
impl MessageStore for FirestoreDb {
    async fn create_message(&self, message: &Message) -> Result<(), AppError> {
        self.set_doc(collections::MESSAGES, &message.id, message)
            .await
    }

    async fn get_message(&self, id: &str) -> Result<Option<Message>, AppError> {
        self.get_doc(collections::MESSAGES, id).await
    }

    async fn list_messages_received(&self, uid: &str) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self
            .list_where_eq(collections::MESSAGES, "receiver_id", uid)
            .await?;
        newest_first(&mut messages, |m| (m.created_at, m.id.as_str()));
        Ok(messages)
    }

    async fn list_messages_sent(&self, uid: &str) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self
            .list_where_eq(collections::MESSAGES, "sender_id", uid)
            .await?;
        newest_first(&mut messages, |m| (m.created_at, m.id.as_str()));
        Ok(messages)
    }

    async fn mark_message_read(&self, id: &str) -> Result<(), AppError> {
        let Some(mut message) = self.get_message(id).await? else {
            return Ok(());
        };
        message.is_read = true;
        // Only `is_read` is written, so a concurrent soft delete is preserved
        let _: () = self
            .client
            .fluent()
            .update()
            .fields(["is_read"])
            .in_col(collections::MESSAGES)
            .document_id(id)
            .object(&message)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete_message_for(&self, id: &str, party: MessageParty) -> Result<bool, AppError> {
        let id = id.to_string();
        self.client
            .run_transaction(|db, transaction| {
                let id = id.clone();
                Box::pin(async move {
                    let current: Option<Message> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::MESSAGES)
                        .obj()
                        .one(&id)
                        .await?;
                    let Some(mut message) = current else {
                        return Ok(false);
                    };
                    if message.delete_for(party) {
                        db.fluent()
                            .delete()
                            .from(collections::MESSAGES)
                            .document_id(&id)
                            .add_to_transaction(transaction)?;
                    } else {
                        db.fluent()
                            .update()
                            .fields(MESSAGE_DELETE_FIELDS)
                            .in_col(collections::MESSAGES)
                            .document_id(&id)
                            .object(&message)
                            .add_to_transaction(transaction)?;
                    }
                    TxResult::Ok(true)
                })
            })
            .await
            .map_err(db_error)
    }
}

// ─── Reward & Gallery Operations ─────────────────────────────

#[async_trait]
impl RewardStore for FirestoreDb {
    async fn create_reward(&self, reward: &Reward) -> Result<(), AppError> {
        self.set_doc(collections::REWARDS, &reward.id, reward).await
    }

    async fn list_rewards(&self) -> Result<Vec<Reward>, AppError> {
        let mut rewards: Vec<Reward> = self.list_all(collections::REWARDS).await?;
        newest_first(&mut rewards, |r| (r.given_at, r.id.as_str()));
        Ok(rewards)
    }

    async fn delete_reward(&self, id: &str) -> Result<bool, AppError> {
        let removed: Option<Reward> = self.delete_existing(collections::REWARDS, id).await?;
        Ok(removed.is_some())
    }
}

#[async_trait]
impl GalleryStore for FirestoreDb {
    async fn create_gallery_image(&self, image: &GalleryImage) -> Result<(), AppError> {
        self.set_doc(collections::GALLERY, &image.id, image).await
    }

    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, AppError> {
        let mut images: Vec<GalleryImage> = self.list_all(collections::GALLERY).await?;
        newest_first(&mut images, |g| (g.created_at, g.id.as_str()));
        Ok(images)
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool, AppError> {
        let removed: Option<GalleryImage> =
            self.delete_existing(collections::GALLERY, id).await?;
        Ok(removed.is_some())
    }
}

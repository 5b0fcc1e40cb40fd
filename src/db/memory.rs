// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local store backed by `DashMap`.
//!
//! Each document lives in its own map entry; holding the entry's write guard
//! for the whole read-modify-write gives the same per-document atomicity a
//! Firestore transaction does. Guards are never held across an `.await`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::db::{
    newest_first, GalleryStore, MessageStore, PostStore, RewardStore, UserMutation, UserStore,
};
use crate::error::Result;
use crate::models::{
    Comment, GalleryImage, LikeToggle, Message, MessageParty, Post, PostCategory, PostEdit,
    Reward, User,
};

/// In-memory database for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryDb {
    users: DashMap<String, User>,
    posts: DashMap<String, Post>,
    messages: DashMap<String, Message>,
    rewards: DashMap<String, Reward>,
    gallery: DashMap<String, GalleryImage>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_posts(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        newest_first(&mut posts, |p| (p.created_at, p.id.as_str()));
        posts
    }

    fn collect_messages(&self, filter: impl Fn(&Message) -> bool) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        newest_first(&mut messages, |m| (m.created_at, m.id.as_str()));
        messages
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        Ok(self.users.get(uid).map(|u| u.value().clone()))
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let stored = self
            .users
            .entry(user.uid.clone())
            .or_insert_with(|| user.clone());
        Ok(stored.value().clone())
    }

    async fn update_user_atomic(
        &self,
        uid: &str,
        mutation: UserMutation,
    ) -> Result<Option<User>> {
        let Some(mut entry) = self.users.get_mut(uid) else {
            return Ok(None);
        };
        mutation.apply(entry.value_mut());
        Ok(Some(entry.value().clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.iter().map(|u| u.value().clone()).collect())
    }

    async fn delete_user(&self, uid: &str) -> Result<bool> {
        Ok(self.users.remove(uid).is_some())
    }
}

#[async_trait]
impl PostStore for MemoryDb {
    async fn create_post(&self, post: &Post) -> Result<()> {
        self.posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get(id).map(|p| p.value().clone()))
    }

    async fn list_posts(&self, category: Option<PostCategory>) -> Result<Vec<Post>> {
        Ok(self.collect_posts(|p| category.is_none_or(|c| p.category == c)))
    }

    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        Ok(self.collect_posts(|p| p.author_id == author_id))
    }

    async fn edit_post(&self, id: &str, edit: &PostEdit, now: DateTime<Utc>) -> Result<bool> {
        let Some(mut post) = self.posts.get_mut(id) else {
            return Ok(false);
        };
        post.title = edit.title.clone();
        post.content = edit.content.clone();
        if let Some(image_url) = &edit.image_url {
            post.image_url = image_url.clone();
        }
        post.updated_at = now;
        Ok(true)
    }

    async fn delete_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.remove(id).map(|(_, post)| post))
    }

    async fn toggle_like(&self, id: &str, uid: &str) -> Result<Option<LikeToggle>> {
        let Some(mut post) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        let liked = if post.is_liked_by(uid) {
            post.remove_like(uid);
            false
        } else {
            post.add_like(uid);
            true
        };
        Ok(Some(LikeToggle {
            liked,
            author_id: post.author_id.clone(),
            like_count: post.likes.len(),
        }))
    }

    async fn add_comment(&self, id: &str, comment: &Comment) -> Result<bool> {
        let Some(mut post) = self.posts.get_mut(id) else {
            return Ok(false);
        };
        post.comments.push(comment.clone());
        Ok(true)
    }

    async fn remove_comment(&self, id: &str, comment_id: &str) -> Result<Option<Comment>> {
        Ok(self
            .posts
            .get_mut(id)
            .and_then(|mut post| post.take_comment(comment_id)))
    }
}

#[async_trait]
impl MessageStore for MemoryDb {
    async fn create_message(&self, message: &Message) -> Result<()> {
        self.messages.insert(message.id.clone(), message.clone());
        Ok(())
    }

    async fn get_message(&self, id: &str) -> Result<Option<Message>> {
        Ok(self.messages.get(id).map(|m| m.value().clone()))
    }

    async fn list_messages_received(&self, uid: &str) -> Result<Vec<Message>> {
        Ok(self.collect_messages(|m| m.receiver_id == uid))
    }

    async fn list_messages_sent(&self, uid: &str) -> Result<Vec<Message>> {
        Ok(self.collect_messages(|m| m.sender_id == uid))
    }

    async fn mark_message_read(&self, id: &str) -> Result<()> {
        if let Some(mut message) = self.messages.get_mut(id) {
            message.is_read = true;
        }
        Ok(())
    }

    async fn delete_message_for(&self, id: &str, party: MessageParty) -> Result<bool> {
        let fully_deleted = match self.messages.get_mut(id) {
            Some(mut message) => message.delete_for(party),
            None => return Ok(false),
        };
        if fully_deleted {
            self.messages
                .remove_if(id, |_, m| m.deleted_by_sender && m.deleted_by_receiver);
        }
        Ok(true)
    }
}

#[async_trait]
impl RewardStore for MemoryDb {
    async fn create_reward(&self, reward: &Reward) -> Result<()> {
        self.rewards.insert(reward.id.clone(), reward.clone());
        Ok(())
    }

    async fn list_rewards(&self) -> Result<Vec<Reward>> {
        let mut rewards: Vec<Reward> = self.rewards.iter().map(|r| r.value().clone()).collect();
        newest_first(&mut rewards, |r| (r.given_at, r.id.as_str()));
        Ok(rewards)
    }

    async fn delete_reward(&self, id: &str) -> Result<bool> {
        Ok(self.rewards.remove(id).is_some())
    }
}

#[async_trait]
impl GalleryStore for MemoryDb {
    async fn create_gallery_image(&self, image: &GalleryImage) -> Result<()> {
        self.gallery.insert(image.id.clone(), image.clone());
        Ok(())
    }

    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>> {
        let mut images: Vec<GalleryImage> =
            self.gallery.iter().map(|g| g.value().clone()).collect();
        newest_first(&mut images, |g| (g.created_at, g.id.as_str()));
        Ok(images)
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        Ok(self.gallery.remove(id).is_some())
    }
}

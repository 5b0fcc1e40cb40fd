// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. Each test uses unique ids, so
//! runs against a shared emulator do not interfere.

use guild_board::db::{MessageStore, PostStore, UserMutation, UserStore};
use guild_board::models::{
    Comment, Message, MessageParty, Post, PostCategory, PostDraft, PostEdit, TierType, User,
};
use guild_board::services::{PointLedger, PostLifecycle};
use std::sync::Arc;

mod common;
use common::{principal, test_db};

/// Generate a unique uid for test isolation.
fn unique_uid(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn test_user(uid: &str, points: u64) -> User {
    let mut user = User::new(&principal(uid), chrono::Utc::now());
    user.points = points;
    user.refresh_tier();
    user
}

fn test_post(author: &User) -> Post {
    Post::new(
        author.snapshot(),
        PostDraft {
            title: "Emulator".to_string(),
            content: "Integration".to_string(),
            category: PostCategory::Free,
            image_url: None,
        },
        chrono::Utc::now(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_user_is_idempotent() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");

    assert!(db.get_user(&uid).await.unwrap().is_none());

    let created = db.create_user(&test_user(&uid, 40)).await.unwrap();
    assert_eq!(created.points, 40);

    // A second registration must not reset the stored record
    let again = db.create_user(&test_user(&uid, 0)).await.unwrap();
    assert_eq!(again.points, 40);
}

#[tokio::test]
async fn test_update_user_atomic_writes_only_named_fields() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");
    let mut user = test_user(&uid, 90);
    user.nickname = Some("Original".to_string());
    db.create_user(&user).await.unwrap();

    let updated = db
        .update_user_atomic(
            &uid,
            UserMutation::new(&["points", "tier"], |u| {
                u.points += 20;
                u.refresh_tier();
                // Not in the field list, so never persisted
                u.nickname = Some("Clobbered".to_string());
            }),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.points, 110);

    let stored = db.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(stored.points, 110);
    assert_eq!(stored.tier, TierType::Silver);
    assert_eq!(stored.nickname.as_deref(), Some("Original"));

    let missing = db
        .update_user_atomic(&unique_uid("ghost"), UserMutation::new(&["points"], |u| u.points += 1))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_concurrent_ledger_deltas() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let uid = unique_uid("racer");
    db.create_user(&test_user(&uid, 0)).await.unwrap();
    let ledger = PointLedger::new(db.clone());

    let mut handles = vec![];
    for _ in 0..10 {
        let ledger = ledger.clone();
        let uid = uid.clone();
        handles.push(tokio::spawn(async move { ledger.apply_delta(&uid, 2).await }));
    }
    for handle in handles {
        handle.await.expect("Task join failed").expect("Delta failed");
    }

    let stored = db.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(stored.points, 20, "Point increments lost due to race condition");
}

// ═══════════════════════════════════════════════════════════════════════════
// POST TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_post_like_toggle_and_comments() {
    require_emulator!();

    let db = test_db().await;
    let author = test_user(&unique_uid("author"), 0);
    let post = test_post(&author);
    db.create_post(&post).await.unwrap();

    let liked = db.toggle_like(&post.id, "fan").await.unwrap().unwrap();
    assert!(liked.liked);
    assert_eq!(liked.author_id, author.uid);
    let unliked = db.toggle_like(&post.id, "fan").await.unwrap().unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);

    let comment = Comment::new(author.snapshot(), "first".to_string(), chrono::Utc::now());
    assert!(db.add_comment(&post.id, &comment).await.unwrap());
    let removed = db.remove_comment(&post.id, &comment.id).await.unwrap();
    assert_eq!(removed.map(|c| c.id), Some(comment.id.clone()));
    assert!(db.remove_comment(&post.id, &comment.id).await.unwrap().is_none());

    let edit = PostEdit {
        title: "Edited".to_string(),
        content: "Edited".to_string(),
        image_url: None,
    };
    assert!(db.edit_post(&post.id, &edit, chrono::Utc::now()).await.unwrap());
    assert_eq!(db.get_post(&post.id).await.unwrap().unwrap().title, "Edited");

    assert!(db.delete_post(&post.id).await.unwrap().is_some());
    assert!(db.delete_post(&post.id).await.unwrap().is_none());
    assert!(db.toggle_like(&post.id, "fan").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lifecycle_on_firestore() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let author = db.create_user(&test_user(&unique_uid("author"), 0)).await.unwrap();
    let fan = db.create_user(&test_user(&unique_uid("fan"), 0)).await.unwrap();
    let posts = PostLifecycle::new(db.clone(), PointLedger::new(db.clone()));

    let post = posts
        .create_post(
            &author,
            PostDraft {
                title: "Hello".to_string(),
                content: "Emulator".to_string(),
                category: PostCategory::Introduction,
                image_url: None,
            },
        )
        .await
        .unwrap();
    posts.toggle_like(&fan, &post.id).await.unwrap();
    assert_eq!(db.get_user(&author.uid).await.unwrap().unwrap().points, 52);

    posts.delete_post(&author, &post.id).await.unwrap();
    assert_eq!(db.get_user(&author.uid).await.unwrap().unwrap().points, 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// MESSAGE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_message_removed_after_both_parties_delete() {
    require_emulator!();

    let db = test_db().await;
    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: unique_uid("sender"),
        sender_name: "Sender".to_string(),
        sender_photo_url: None,
        sender_tier: TierType::Bronze,
        receiver_id: unique_uid("receiver"),
        receiver_name: "Receiver".to_string(),
        title: "Hi".to_string(),
        content: "Hello".to_string(),
        is_read: false,
        created_at: chrono::Utc::now(),
        deleted_by_sender: false,
        deleted_by_receiver: false,
    };
    db.create_message(&message).await.unwrap();

    db.mark_message_read(&message.id).await.unwrap();
    assert!(db.delete_message_for(&message.id, MessageParty::Sender).await.unwrap());

    let stored = db.get_message(&message.id).await.unwrap().unwrap();
    assert!(stored.is_read);
    assert!(stored.deleted_by_sender);
    assert!(!stored.deleted_by_receiver);

    assert!(db.delete_message_for(&message.id, MessageParty::Receiver).await.unwrap());
    assert!(db.get_message(&message.id).await.unwrap().is_none());
}

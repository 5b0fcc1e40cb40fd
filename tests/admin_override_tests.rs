// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin overrides on member flags, points and the reward log.

use guild_board::db::{MemoryDb, UserStore};
use guild_board::error::AppError;
use guild_board::models::{PostCategory, PostDraft, TierType};
use guild_board::services::{AdminOverride, PointLedger, PostLifecycle};
use std::sync::Arc;

mod common;
use common::seed_user;

fn admin_service(db: &Arc<MemoryDb>) -> AdminOverride {
    AdminOverride::new(db.clone(), db.clone(), db.clone(), PointLedger::new(db.clone()))
}

#[tokio::test]
async fn test_challenger_set_and_unset() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "player", 50).await;
    let admin = admin_service(&db);

    let user = admin.set_challenger("player", true).await.unwrap();
    assert!(user.is_challenger);
    assert_eq!(user.tier, TierType::Challenger);
    assert_eq!(user.points, 50);

    let user = admin.set_challenger("player", false).await.unwrap();
    assert!(!user.is_challenger);
    assert_eq!(user.tier, TierType::Bronze);
}

#[tokio::test]
async fn test_challenger_survives_point_changes() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "player", 2990).await;
    let admin = admin_service(&db);

    admin.set_challenger("player", true).await.unwrap();
    let user = admin.adjust_points("player", 20).await.unwrap();
    assert_eq!(user.tier, TierType::Challenger);

    let user = admin.set_challenger("player", false).await.unwrap();
    assert_eq!(user.tier, TierType::Master);
}

#[tokio::test]
async fn test_adjust_points_floors_and_reports_missing() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "player", 30).await;
    let admin = admin_service(&db);

    let user = admin.adjust_points("player", -100).await.unwrap();
    assert_eq!(user.points, 0);

    let err = admin.adjust_points("ghost", 10).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_flags_do_not_touch_points() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "player", 320).await;
    let admin = admin_service(&db);

    admin.set_admin_flag("player", true).await.unwrap();
    let user = admin.set_test_account_flag("player", true).await.unwrap();
    assert!(user.is_admin && user.is_test_account);
    assert_eq!(user.points, 320);
    assert_eq!(user.tier, TierType::Gold);
}

#[tokio::test]
async fn test_delete_user_refuses_admins() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "boss", 0).await;
    seed_user(&db, "member", 0).await;
    let admin = admin_service(&db);
    admin.set_admin_flag("boss", true).await.unwrap();

    let err = admin.delete_user("boss").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidOperation(_)));
    assert!(db.get_user("boss").await.unwrap().is_some());

    admin.delete_user("member").await.unwrap();
    assert!(db.get_user("member").await.unwrap().is_none());

    let err = admin.delete_user("member").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_list_users_includes_test_accounts() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "low", 10).await;
    seed_user(&db, "high", 500).await;
    seed_user(&db, "tester", 100).await;
    let admin = admin_service(&db);
    admin.set_test_account_flag("tester", true).await.unwrap();

    let uids: Vec<_> = admin
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.uid)
        .collect();
    assert_eq!(uids, vec!["high", "tester", "low"]);
}

#[tokio::test]
async fn test_overview_counts() {
    let db = Arc::new(MemoryDb::new());
    let author = seed_user(&db, "author", 0).await;
    seed_user(&db, "tester", 0).await;
    let admin = admin_service(&db);
    admin.set_test_account_flag("tester", true).await.unwrap();
    admin.set_admin_flag("author", true).await.unwrap();

    let posts = PostLifecycle::new(db.clone(), PointLedger::new(db.clone()));
    posts
        .create_post(
            &author,
            PostDraft {
                title: "Welcome".to_string(),
                content: "Hi all".to_string(),
                category: PostCategory::Introduction,
                image_url: None,
            },
        )
        .await
        .unwrap();

    let overview = admin.overview().await.unwrap();
    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.test_accounts, 1);
    assert_eq!(overview.admins, 1);
    assert_eq!(overview.challengers, 0);
    assert_eq!(overview.total_posts, 1);
    assert_eq!(overview.total_rewards, 0);
}

#[tokio::test]
async fn test_reward_log() {
    let db = Arc::new(MemoryDb::new());
    let boss = seed_user(&db, "boss", 0).await;
    seed_user(&db, "winner", 0).await;
    let admin = admin_service(&db);

    let err = admin
        .give_reward(&boss, "winner", "   ", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin
        .give_reward(&boss, "ghost", "MVP", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let reward = admin
        .give_reward(&boss, "winner", " Season MVP ", "Top fragger")
        .await
        .unwrap();
    assert_eq!(reward.reward_name, "Season MVP");
    assert_eq!(reward.given_by, boss.public_name());

    // Rewards carry no points
    assert_eq!(db.get_user("winner").await.unwrap().unwrap().points, 0);

    assert_eq!(admin.list_rewards().await.unwrap().len(), 1);
    admin.delete_reward(&reward.id).await.unwrap();
    assert!(admin.list_rewards().await.unwrap().is_empty());

    let err = admin.delete_reward(&reward.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

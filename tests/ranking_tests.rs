// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking projection over the store.

use guild_board::db::MemoryDb;
use guild_board::models::TierType;
use guild_board::services::{AdminOverride, PointLedger, RankingProjection};
use std::sync::Arc;

mod common;
use common::seed_user;

#[tokio::test]
async fn test_ranking_excludes_top_scoring_test_account() {
    let db = Arc::new(MemoryDb::new());
    seed_user(&db, "qa-bot", 9000).await;
    seed_user(&db, "alice", 1600).await;
    seed_user(&db, "bob", 120).await;
    let admin = AdminOverride::new(db.clone(), db.clone(), db.clone(), PointLedger::new(db.clone()));
    admin.set_test_account_flag("qa-bot", true).await.unwrap();

    let ranking = RankingProjection::new(db.clone());
    let entries = ranking.rank(10).await.unwrap();

    let rows: Vec<_> = entries
        .iter()
        .map(|e| (e.rank, e.uid.as_str(), e.tier))
        .collect();
    assert_eq!(
        rows,
        vec![(1, "alice", TierType::Diamond), (2, "bob", TierType::Silver)]
    );
    assert!(ranking.position_of("qa-bot").await.unwrap().is_none());
}

#[tokio::test]
async fn test_limit_truncates_but_position_uses_full_ranking() {
    let db = Arc::new(MemoryDb::new());
    for (i, points) in [500u64, 400, 300, 200, 100].into_iter().enumerate() {
        seed_user(&db, &format!("m{}", i), points).await;
    }
    let ranking = RankingProjection::new(db.clone());

    let top = ranking.rank(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].uid, "m0");

    let me = ranking.position_of("m4").await.unwrap().unwrap();
    assert_eq!(me.rank, 5);
    assert_eq!(me.points_to_next_tier, Some(200));
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member ranking projection.

use std::sync::Arc;

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::UserStore;
use crate::error::Result;
use crate::models::tier::{points_to_next_tier, progress_fraction, resolve_tier};
use crate::models::{TierType, User};

/// One row of the ranking page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankingEntry {
    /// 1-based position
    pub rank: usize,
    pub uid: String,
    pub name: String,
    pub photo_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub tier: TierType,
    pub next_tier: Option<TierType>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub points_to_next_tier: Option<u64>,
    /// Progress through the current tier, in `[0, 1]`
    pub progress: f64,
}

/// Rank members by points, highest first, ties broken by uid.
///
/// Test accounts are excluded. Tiers are re-derived from points so a stale
/// cached tier never reaches the page.
pub fn project_ranking(mut users: Vec<User>) -> Vec<RankingEntry> {
    users.retain(|u| !u.is_test_account);
    users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.uid.cmp(&b.uid)));

    users
        .into_iter()
        .enumerate()
        .map(|(i, user)| {
            let tier = resolve_tier(user.points, user.is_challenger);
            RankingEntry {
                rank: i + 1,
                name: user.public_name().to_string(),
                next_tier: tier.next(),
                points_to_next_tier: points_to_next_tier(user.points, tier),
                progress: progress_fraction(user.points, tier),
                uid: user.uid,
                photo_url: user.photo_url,
                points: user.points,
                tier,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct RankingProjection {
    users: Arc<dyn UserStore>,
}

impl RankingProjection {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// The top `limit` members.
    pub async fn rank(&self, limit: usize) -> Result<Vec<RankingEntry>> {
        let mut entries = project_ranking(self.users.list_users().await?);
        entries.truncate(limit);
        Ok(entries)
    }

    /// The member's row in the full ranking, `None` for test accounts or unknown uids.
    pub async fn position_of(&self, uid: &str) -> Result<Option<RankingEntry>> {
        let entries = project_ranking(self.users.list_users().await?);
        Ok(entries.into_iter().find(|e| e.uid == uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Principal;
    use chrono::Utc;

    fn member(uid: &str, points: u64) -> User {
        let mut user = User::new(
            &Principal {
                uid: uid.to_string(),
                email: format!("{}@example.com", uid),
                display_name: uid.to_uppercase(),
                photo_url: None,
            },
            Utc::now(),
        );
        user.points = points;
        user.refresh_tier();
        user
    }

    #[test]
    fn test_ties_broken_by_uid() {
        let entries = project_ranking(vec![member("b", 100), member("a", 100), member("c", 300)]);
        let order: Vec<_> = entries.iter().map(|e| (e.rank, e.uid.as_str())).collect();
        assert_eq!(order, vec![(1, "c"), (2, "a"), (3, "b")]);
    }

    #[test]
    fn test_entry_progress_fields() {
        let mut champ = member("champ", 10);
        champ.is_challenger = true;
        let entries = project_ranking(vec![member("s", 200), member("m", 5000), champ]);

        let master = &entries[0];
        assert_eq!(master.tier, TierType::Master);
        assert_eq!(master.points_to_next_tier, None);
        assert_eq!(master.progress, 1.0);

        let silver = &entries[1];
        assert_eq!(silver.tier, TierType::Silver);
        assert_eq!(silver.next_tier, Some(TierType::Gold));
        assert_eq!(silver.points_to_next_tier, Some(100));
        assert!((silver.progress - 0.5).abs() < f64::EPSILON);

        let challenger = &entries[2];
        assert_eq!(challenger.tier, TierType::Challenger);
        assert_eq!(challenger.next_tier, None);
        assert_eq!(challenger.progress, 1.0);
    }

    #[test]
    fn test_test_accounts_excluded() {
        let mut tester = member("tester", 9999);
        tester.is_test_account = true;
        let entries = project_ranking(vec![tester, member("real", 1)]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uid, "real");
        assert_eq!(entries[0].rank, 1);
    }
}

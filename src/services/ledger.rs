// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point ledger: the single writer of `points` and `tier`.
//!
//! Every balance change goes through [`PointLedger::apply_delta`], which runs
//! as one atomic read-modify-write per user in the backing store.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::db::{user_fields, UserMutation, UserStore};
use crate::error::Result;
use crate::models::points::apply_floor;
use crate::models::User;

/// A committed balance change.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub user: User,
    /// Points actually moved. Smaller in magnitude than the requested delta
    /// when the balance was floored at zero.
    pub applied: i64,
}

/// Applies signed point deltas to members.
#[derive(Clone)]
pub struct PointLedger {
    users: Arc<dyn UserStore>,
}

impl PointLedger {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Add `delta` to the user's points (floored at zero) and re-derive the tier.
    ///
    /// A missing user is a no-op returning `Ok(None)`; content whose author
    /// has since been deleted must not fail the request that touched it.
    pub async fn apply_delta(&self, uid: &str, delta: i64) -> Result<Option<LedgerEntry>> {
        // Written on every attempt, so a retried transaction leaves the value
        // from the attempt that committed.
        let applied = Arc::new(AtomicI64::new(0));
        let recorded = applied.clone();
        let mutation = UserMutation::new(&[user_fields::POINTS, user_fields::TIER], move |user| {
            let before = user.points;
            user.points = apply_floor(before, delta);
            user.refresh_tier();
            let moved = i128::from(user.points) - i128::from(before);
            recorded.store(i64::try_from(moved).unwrap_or(delta), Ordering::Relaxed);
        });

        let Some(user) = self.users.update_user_atomic(uid, mutation).await? else {
            tracing::debug!(uid, delta, "Point delta skipped: user not found");
            return Ok(None);
        };
        let applied = applied.load(Ordering::Relaxed);
        tracing::debug!(
            uid,
            delta,
            applied,
            points = user.points,
            tier = ?user.tier,
            "Applied point delta"
        );
        Ok(Some(LedgerEntry { user, applied }))
    }
}

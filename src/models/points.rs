// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed point grants for content actions.

use crate::models::post::PostCategory;

/// Point amounts granted (and reversed) by content lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointValues {
    /// Writing a self-introduction post
    pub introduction: i64,
    /// Writing a free-board or game-recommendation post
    pub post: i64,
    /// Writing a comment
    pub comment: i64,
    /// Receiving a like (credited to the post author)
    pub like_received: i64,
}

pub const POINT_VALUES: PointValues = PointValues {
    introduction: 50,
    post: 10,
    comment: 3,
    like_received: 2,
};

impl PointValues {
    /// Grant for creating a post in `category`; deletion reverses the same amount.
    pub const fn for_post(&self, category: PostCategory) -> i64 {
        match category {
            PostCategory::Introduction => self.introduction,
            PostCategory::Free | PostCategory::Games => self.post,
        }
    }
}

/// Apply a signed delta to a point total, flooring at zero.
///
/// Reversing a grant after the floor was hit does not restore the earlier
/// total; callers accept that asymmetry.
pub fn apply_floor(points: u64, delta: i64) -> u64 {
    let next = i128::from(points) + i128::from(delta);
    u64::try_from(next.max(0)).unwrap_or(u64::MAX)
}

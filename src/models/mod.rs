// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod message;
pub mod points;
pub mod post;
pub mod reward;
pub mod tier;
pub mod user;

pub use message::{Message, MessageParty};
pub use points::{PointValues, POINT_VALUES};
pub use post::{Comment, LikeToggle, Post, PostCategory, PostDraft, PostEdit};
pub use reward::{GalleryImage, Reward};
pub use tier::{resolve_tier, TierType, TIER_THRESHOLDS};
pub use user::{AuthorSnapshot, Principal, ProfileUpdate, User};

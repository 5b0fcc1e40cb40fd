// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admin;
pub mod gallery;
pub mod ledger;
pub mod lifecycle;
pub mod messages;
pub mod ranking;
pub mod users;

pub use admin::{parse_delta, AdminOverride, AdminOverview};
pub use gallery::GalleryService;
pub use ledger::{LedgerEntry, PointLedger};
pub use lifecycle::{LikeOutcome, PostLifecycle};
pub use messages::MessageService;
pub use ranking::{project_ranking, RankingEntry, RankingProjection};
pub use users::UserDirectory;

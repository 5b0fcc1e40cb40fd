// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Guild Board: community backend for a university gaming club.
//!
//! This crate provides the API for the club's boards, private messages and
//! gallery, and the point ledger that turns member activity into tiers.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::Datastore;
use services::{
    AdminOverride, GalleryService, MessageService, PointLedger, PostLifecycle,
    RankingProjection, UserDirectory,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserDirectory,
    pub posts: PostLifecycle,
    pub admin: AdminOverride,
    pub ranking: RankingProjection,
    pub messages: MessageService,
    pub gallery: GalleryService,
}

impl AppState {
    /// Wire every service to one datastore backend.
    pub fn new<D>(config: Config, store: Arc<D>) -> Self
    where
        D: Datastore + 'static,
    {
        let ledger = PointLedger::new(store.clone());
        Self {
            users: UserDirectory::new(store.clone()),
            posts: PostLifecycle::new(store.clone(), ledger.clone()),
            admin: AdminOverride::new(store.clone(), store.clone(), store.clone(), ledger),
            ranking: RankingProjection::new(store.clone()),
            messages: MessageService::new(store.clone(), store.clone()),
            gallery: GalleryService::new(store),
            config,
        }
    }
}

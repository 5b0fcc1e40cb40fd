//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::tier::{resolve_tier, TierType};

/// Member profile stored in Firestore (`users/{uid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider uid (also used as document ID)
    pub uid: String,
    pub email: String,
    /// Name from the identity provider
    pub display_name: String,
    /// Club nickname, preferred over `display_name` when set
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Accrued points, never negative
    #[serde(default)]
    pub points: u64,
    /// Cached `resolve_tier(points, is_challenger)`
    #[serde(default = "default_tier")]
    pub tier: TierType,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_challenger: bool,
    /// Hidden from ranking and member listings
    #[serde(default)]
    pub is_test_account: bool,
    pub created_at: DateTime<Utc>,

    // ─── Profile ─────────────────────────────────────────────────
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub favorite_game: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub lol_nickname: Option<String>,
    #[serde(default)]
    pub main_position: Option<String>,
}

fn default_tier() -> TierType {
    TierType::Bronze
}

impl User {
    /// A freshly registered member: zero points, bronze, no flags.
    pub fn new(principal: &Principal, now: DateTime<Utc>) -> Self {
        Self {
            uid: principal.uid.clone(),
            email: principal.email.clone(),
            display_name: principal.display_name.clone(),
            nickname: None,
            photo_url: principal.photo_url.clone(),
            points: 0,
            tier: TierType::Bronze,
            is_admin: false,
            is_challenger: false,
            is_test_account: false,
            created_at: now,
            introduction: None,
            favorite_game: None,
            student_id: None,
            lol_nickname: None,
            main_position: None,
        }
    }

    /// Name shown on content snapshots and listings.
    pub fn public_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.display_name)
    }

    /// Re-derive the cached tier from points and the challenger flag.
    pub fn refresh_tier(&mut self) {
        self.tier = resolve_tier(self.points, self.is_challenger);
    }

    /// Frozen copy of the fields embedded in content this user creates.
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.uid.clone(),
            name: self.public_name().to_string(),
            photo_url: self.photo_url.clone(),
            tier: self.tier,
        }
    }
}

/// Authenticated identity handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// Author fields copied into posts, comments and messages at creation time.
///
/// Never updated afterwards and never used to compute points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSnapshot {
    pub id: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub tier: TierType,
}

/// Self-service profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub photo_url: Option<String>,
    pub introduction: Option<String>,
    pub favorite_game: Option<String>,
    pub student_id: Option<String>,
    pub lol_nickname: Option<String>,
    pub main_position: Option<String>,
}

impl ProfileUpdate {
    /// Apply the edit to a user record. Points, tier and flags are not touched.
    pub fn apply_to(&self, user: &mut User) {
        let fields = [
            (&self.nickname, &mut user.nickname),
            (&self.photo_url, &mut user.photo_url),
            (&self.introduction, &mut user.introduction),
            (&self.favorite_game, &mut user.favorite_game),
            (&self.student_id, &mut user.student_id),
            (&self.lol_nickname, &mut user.lol_nickname),
            (&self.main_position, &mut user.main_position),
        ];
        for (update, field) in fields {
            if let Some(value) = update {
                *field = Some(value.clone());
            }
        }
    }
}

//! Database layer: store ports and their Firestore / in-memory backends.
//!
//! Services depend on the narrow traits here, never on a backend directly.
//! Every list-like field (`likes`, `comments`) and the per-user point counter
//! is mutated through a backend-level atomic operation: a Firestore
//! transaction, or a per-document lock in memory.

pub mod firestore;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Comment, GalleryImage, LikeToggle, Message, MessageParty, Post, PostCategory, PostEdit,
    Reward, User,
};

pub use self::firestore::FirestoreDb;
pub use self::memory::MemoryDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const POSTS: &str = "posts";
    pub const MESSAGES: &str = "messages";
    pub const REWARDS: &str = "rewards";
    pub const GALLERY: &str = "gallery";
}

/// Stored field names of [`User`], for partial updates.
pub mod user_fields {
    pub const POINTS: &str = "points";
    pub const TIER: &str = "tier";
    pub const IS_ADMIN: &str = "is_admin";
    pub const IS_CHALLENGER: &str = "is_challenger";
    pub const IS_TEST_ACCOUNT: &str = "is_test_account";
    pub const PROFILE: [&str; 7] = [
        "nickname",
        "photo_url",
        "introduction",
        "favorite_game",
        "student_id",
        "lol_nickname",
        "main_position",
    ];
}

/// A read-modify-write on one user document.
///
/// `fields` names every stored field `apply` may change; backends write only
/// those, so unrelated fields edited concurrently are not clobbered. `apply`
/// may run more than once if the backend retries on contention.
#[derive(Clone)]
pub struct UserMutation {
    fields: Vec<&'static str>,
    apply: Arc<dyn Fn(&mut User) + Send + Sync>,
}

impl UserMutation {
    pub fn new<F>(fields: &[&'static str], apply: F) -> Self
    where
        F: Fn(&mut User) + Send + Sync + 'static,
    {
        Self {
            fields: fields.to_vec(),
            apply: Arc::new(apply),
        }
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn apply(&self, user: &mut User) {
        (self.apply)(user);
    }
}

impl std::fmt::Debug for UserMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserMutation")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Member records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, uid: &str) -> Result<Option<User>>;

    /// Insert `user` unless a record with the same uid exists.
    ///
    /// Returns whichever record is stored afterwards.
    async fn create_user(&self, user: &User) -> Result<User>;

    /// Atomically apply `mutation` to the user and persist its fields.
    ///
    /// Returns the updated record, or `None` if the user does not exist.
    async fn update_user_atomic(&self, uid: &str, mutation: UserMutation)
        -> Result<Option<User>>;

    /// All users, in no particular order.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_user(&self, uid: &str) -> Result<bool>;
}

/// Board posts with embedded likes and comments.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, post: &Post) -> Result<()>;

    async fn get_post(&self, id: &str) -> Result<Option<Post>>;

    /// Posts newest first, optionally restricted to one board.
    async fn list_posts(&self, category: Option<PostCategory>) -> Result<Vec<Post>>;

    /// Posts by one author, newest first.
    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>>;

    /// Overwrite title/content/image. Returns `false` if the post is missing.
    async fn edit_post(&self, id: &str, edit: &PostEdit, now: DateTime<Utc>) -> Result<bool>;

    /// Atomically remove the post, returning it if it existed.
    async fn delete_post(&self, id: &str) -> Result<Option<Post>>;

    /// Atomically add `uid` to likes if absent, otherwise remove it.
    ///
    /// Returns `None` if the post is missing.
    async fn toggle_like(&self, id: &str, uid: &str) -> Result<Option<LikeToggle>>;

    /// Append a comment. Returns `false` if the post is missing.
    async fn add_comment(&self, id: &str, comment: &Comment) -> Result<bool>;

    /// Atomically remove a comment by its id, returning it if it was present.
    async fn remove_comment(&self, id: &str, comment_id: &str) -> Result<Option<Comment>>;
}

/// Private messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(&self, message: &Message) -> Result<()>;

    async fn get_message(&self, id: &str) -> Result<Option<Message>>;

    /// Messages addressed to `uid`, newest first, including ones they deleted.
    async fn list_messages_received(&self, uid: &str) -> Result<Vec<Message>>;

    /// Messages sent by `uid`, newest first, including ones they deleted.
    async fn list_messages_sent(&self, uid: &str) -> Result<Vec<Message>>;

    async fn mark_message_read(&self, id: &str) -> Result<()>;

    /// Atomically flag the message deleted for `party`, removing the record
    /// once both parties have deleted it. Returns `false` if it is missing.
    async fn delete_message_for(&self, id: &str, party: MessageParty) -> Result<bool>;
}

/// Admin reward log.
#[async_trait]
pub trait RewardStore: Send + Sync {
    async fn create_reward(&self, reward: &Reward) -> Result<()>;

    /// Rewards newest first.
    async fn list_rewards(&self) -> Result<Vec<Reward>>;

    async fn delete_reward(&self, id: &str) -> Result<bool>;
}

/// Gallery photo records.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn create_gallery_image(&self, image: &GalleryImage) -> Result<()>;

    /// Images newest first.
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>>;

    async fn delete_gallery_image(&self, id: &str) -> Result<bool>;
}

/// Every store the application needs, implemented by one backend.
pub trait Datastore: UserStore + PostStore + MessageStore + RewardStore + GalleryStore {}

impl<T> Datastore for T where T: UserStore + PostStore + MessageStore + RewardStore + GalleryStore
{}

/// Newest-first ordering with a stable id tiebreak.
pub(crate) fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, &str)) {
    items.sort_by(|a, b| {
        let (a_time, a_id) = key(a);
        let (b_time, b_id) = key(b);
        b_time.cmp(&a_time).then_with(|| a_id.cmp(b_id))
    });
}

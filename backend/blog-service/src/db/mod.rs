/// Persistence layer
///
/// `BlogStore` is the seam between the services and storage. Two backends
/// implement it:
///
/// - `PgStore`: relational schema (users, posts, media, post_likes,
///   comments) with cascading foreign keys
/// - `MemoryStore`: document-style records where each post embeds its media
///   list, like-set and comment id list
pub mod comment_repo;
pub mod like_repo;
pub mod memory_store;
pub mod pg_store;
pub mod post_repo;
pub mod user_repo;

pub use memory_store::MemoryStore;
pub use pg_store::{PgStore, MIGRATOR};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, NewUser, Post, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record referenced by the write does not exist
    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait BlogStore: Send + Sync {
    // Users

    /// Insert a user. Returns `None` when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// Lookup by email, compared case-insensitively
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    // Posts

    async fn insert_post(&self, post: &Post) -> StoreResult<()>;
    /// All posts, newest first
    async fn list_posts(&self) -> StoreResult<Vec<Post>>;
    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>>;
    /// Persist title, content, `updated_at` and the full media list of a post
    async fn save_post(&self, post: &Post) -> StoreResult<()>;
    /// Delete a post with its comments, media and likes. Returns false if absent.
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;

    // Likes

    /// Add `user_id` to the like-set. Returns false if it was already present.
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    /// Remove `user_id` from the like-set. Returns false if it was not present.
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    // Comments

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    /// Comments on a post, newest first
    async fn list_comments_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>>;
    /// Comments on any of the given posts, newest first
    async fn list_comments_for_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;

    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;
}

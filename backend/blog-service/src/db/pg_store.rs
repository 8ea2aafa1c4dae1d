use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use uuid::Uuid;

use super::{comment_repo, like_repo, post_repo, user_repo, BlogStore, StoreError, StoreResult};
use crate::models::{Comment, NewUser, Post, User};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Relational backend over a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }
}

fn foreign_key_as_missing(err: sqlx::Error, what: &'static str) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::MissingReference(what)
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<Option<User>> {
        Ok(user_repo::create_user(&self.pool, &new_user).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(user_repo::find_user_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(user_repo::find_user_by_email(&self.pool, email).await?)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(user_repo::find_users_by_ids(&self.pool, ids).await?)
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        post_repo::create_post(&self.pool, post)
            .await
            .map_err(|e| foreign_key_as_missing(e, "Author"))
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool).await?)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(post_repo::find_post_by_id(&self.pool, id).await?)
    }

    async fn save_post(&self, post: &Post) -> StoreResult<()> {
        post_repo::update_post(&self.pool, post)
            .await
            .map_err(|e| foreign_key_as_missing(e, "Post"))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        Ok(post_repo::delete_post(&self.pool, id).await?)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        like_repo::create_like(&self.pool, post_id, user_id)
            .await
            .map_err(|e| foreign_key_as_missing(e, "Post"))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Ok(like_repo::delete_like(&self.pool, post_id, user_id).await?)
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        comment_repo::create_comment(&self.pool, comment)
            .await
            .map_err(|e| foreign_key_as_missing(e, "Post"))
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(comment_repo::find_comment_by_id(&self.pool, id).await?)
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(comment_repo::find_comments_by_post(&self.pool, post_id).await?)
    }

    async fn list_comments_for_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        Ok(comment_repo::find_comments_by_posts(&self.pool, post_ids).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(comment_repo::delete_comment(&self.pool, id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

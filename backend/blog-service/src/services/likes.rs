/// Like service
///
/// Each (user, post) pair is either liked or not. Liking twice or unliking a
/// post that was never liked is rejected.
use std::sync::Arc;
use uuid::Uuid;

use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::LikeResponse;

pub struct LikeService {
    store: Arc<dyn BlogStore>,
}

impl LikeService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    pub async fn like(&self, user: &AuthUser, post_id: Uuid) -> Result<LikeResponse> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        if post.is_liked_by(user.id) || !self.store.add_like(post_id, user.id).await? {
            return Err(AppError::BadRequest("Post already liked".into()));
        }

        tracing::info!(post_id = %post_id, user_id = %user.id, "Post liked");
        Ok(LikeResponse {
            message: "Post liked".into(),
            likes: self.current_likes(post_id).await?,
        })
    }

    pub async fn unlike(&self, user: &AuthUser, post_id: Uuid) -> Result<LikeResponse> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        if !post.is_liked_by(user.id) || !self.store.remove_like(post_id, user.id).await? {
            return Err(AppError::BadRequest("Post has not yet been liked".into()));
        }

        tracing::info!(post_id = %post_id, user_id = %user.id, "Post unliked");
        Ok(LikeResponse {
            message: "Post unliked".into(),
            likes: self.current_likes(post_id).await?,
        })
    }

    async fn current_likes(&self, post_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .store
            .find_post(post_id)
            .await?
            .map(|p| p.likes)
            .unwrap_or_default())
    }
}

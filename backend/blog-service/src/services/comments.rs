/// Comment service - create, list by post, delete
use std::sync::Arc;
use uuid::Uuid;

use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::middleware::{check_comment_deletion, AuthUser};
use crate::models::{Comment, CommentView, CreateCommentRequest};

use super::comment_views;

pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    pub async fn create_comment(
        &self,
        author: &AuthUser,
        req: CreateCommentRequest,
    ) -> Result<CommentView> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Comment content is required".into()));
        }
        let post_id = req
            .post_id
            .ok_or_else(|| AppError::Validation("Post ID is required".into()))?;

        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post not found".into()));
        }

        let comment = Comment::new(content.to_string(), author.id, post_id);
        self.store.insert_comment(&comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            user_id = %author.id,
            "Comment created"
        );

        let mut views = comment_views(self.store.as_ref(), vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("comment view assembly failed".into()))
    }

    /// Comments on a post, newest first
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        let comments = self.store.list_comments_for_post(post_id).await?;
        comment_views(self.store.as_ref(), comments).await
    }

    /// Delete a comment; allowed for its author or any admin
    pub async fn delete_comment(&self, user: &AuthUser, comment_id: Uuid) -> Result<()> {
        let comment = self
            .store
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

        check_comment_deletion(user, &comment)?;

        if !self.store.delete_comment(comment.id).await? {
            return Err(AppError::NotFound("Comment not found".into()));
        }

        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            user_id = %user.id,
            "Comment deleted"
        );
        Ok(())
    }
}

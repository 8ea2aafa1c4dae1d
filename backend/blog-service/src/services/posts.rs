/// Post service - creation, retrieval, update with media reconciliation, deletion
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::media::{MediaStorage, UploadedFile};
use crate::middleware::{check_post_ownership, AuthUser};
use crate::models::{AuthorSummary, Media, Post, PostView};

use super::{post_view, post_views};

/// Fields of a multipart post form
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub files: Vec<UploadedFile>,
    /// Raw `keepMedia` values; each may hold several comma-separated ids
    pub keep_media: Vec<String>,
}

pub struct PostService {
    store: Arc<dyn BlogStore>,
    media: Arc<MediaStorage>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>, media: Arc<MediaStorage>) -> Self {
        Self { store, media }
    }

    /// Create a post authored by `author`. Nothing is written when the
    /// title or content is missing.
    pub async fn create_post(&self, author: &AuthUser, form: PostForm) -> Result<PostView> {
        let title = required_field(form.title, "Title")?;
        let content = required_field(form.content, "Content")?;

        let mut post = Post::new(title, content, author.id);
        post.media = self.store_uploads(post.id, &form.files).await?;

        if let Err(e) = self.store.insert_post(&post).await {
            self.discard(&post.media).await;
            return Err(e.into());
        }

        tracing::info!(
            post_id = %post.id,
            user_id = %author.id,
            media_count = post.media.len(),
            "Post created"
        );
        post_view(self.store.as_ref(), post).await
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostView>> {
        let posts = self.store.list_posts().await?;
        post_views(self.store.as_ref(), posts).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        let post = self.find(post_id).await?;
        post_view(self.store.as_ref(), post).await
    }

    /// Update title/content and reconcile media. Only the author may update.
    pub async fn update_post(
        &self,
        user: &AuthUser,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<PostView> {
        let mut post = self.find(post_id).await?;
        check_post_ownership(user.id, &post)?;

        if let Some(title) = form.title {
            post.title = required_field(Some(title), "Title")?;
        }
        if let Some(content) = form.content {
            post.content = required_field(Some(content), "Content")?;
        }

        let keep = parse_keep_media(&form.keep_media);
        let (kept, discarded) = reconcile_media(std::mem::take(&mut post.media), &keep);

        let added = self.store_uploads(post.id, &form.files).await?;
        post.media = kept;
        post.media.extend(added.iter().cloned());
        post.updated_at = Utc::now();

        if let Err(e) = self.store.save_post(&post).await {
            self.discard(&added).await;
            return Err(e.into());
        }
        self.discard(&discarded).await;

        tracing::info!(
            post_id = %post.id,
            user_id = %user.id,
            added = added.len(),
            removed = discarded.len(),
            "Post updated"
        );
        post_view(self.store.as_ref(), post).await
    }

    /// Delete a post with its comments, likes and media. Only the author may delete.
    pub async fn delete_post(&self, user: &AuthUser, post_id: Uuid) -> Result<()> {
        let post = self.find(post_id).await?;
        check_post_ownership(user.id, &post)?;

        if !self.store.delete_post(post.id).await? {
            return Err(AppError::NotFound("Post not found".into()));
        }
        self.discard(&post.media).await;

        tracing::info!(post_id = %post.id, user_id = %user.id, "Post deleted");
        Ok(())
    }

    /// Users who liked the post, in like order
    pub async fn list_likers(&self, post_id: Uuid) -> Result<Vec<AuthorSummary>> {
        let post = self.find(post_id).await?;
        let users = self.store.find_users_by_ids(&post.likes).await?;

        Ok(post
            .likes
            .iter()
            .filter_map(|id| users.iter().find(|u| u.id == *id))
            .map(AuthorSummary::from)
            .collect())
    }

    async fn find(&self, post_id: Uuid) -> Result<Post> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    /// Write uploads to disk. On failure the files already written are removed.
    async fn store_uploads(&self, post_id: Uuid, files: &[UploadedFile]) -> Result<Vec<Media>> {
        let mut stored = Vec::with_capacity(files.len());

        for file in files {
            match self.media.store(file).await {
                Ok(url) => stored.push(Media {
                    id: Uuid::new_v4(),
                    media_type: file.media_type,
                    url,
                    post_id,
                    created_at: Utc::now(),
                }),
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e.into());
                }
            }
        }

        Ok(stored)
    }

    async fn discard(&self, media: &[Media]) {
        for item in media {
            self.media.remove(&item.url).await;
        }
    }
}

fn required_field(value: Option<String>, name: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}

/// Collect media ids from `keepMedia` values. Blank and malformed entries are
/// ignored.
pub fn parse_keep_media(values: &[String]) -> Vec<Uuid> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .filter_map(|id| Uuid::parse_str(id.trim()).ok())
        .collect()
}

/// Split existing media into `(kept, discarded)`.
///
/// An empty keep list discards everything; otherwise exactly the listed ids
/// are kept, in their existing order.
pub fn reconcile_media(existing: Vec<Media>, keep: &[Uuid]) -> (Vec<Media>, Vec<Media>) {
    existing.into_iter().partition(|m| keep.contains(&m.id))
}

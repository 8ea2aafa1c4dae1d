use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogStore, StoreError, StoreResult};
use crate::models::{Comment, NewUser, Post, User};

/// In-process document store.
///
/// Each post document embeds its media list, like-set and comment id list.
/// Cascades are applied explicitly on delete. The lock is held per operation
/// only.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Documents>,
}

#[derive(Default)]
struct Documents {
    seq: u64,
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, (u64, Post)>,
    comments: HashMap<Uuid, (u64, Comment)>,
}

impl Documents {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<Option<User>> {
        let mut docs = self.docs.write().await;
        let email = new_user.email.trim().to_lowercase();

        if docs.users.values().any(|u| u.email == email) {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: Utc::now(),
        };
        docs.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.docs.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let docs = self.docs.read().await;
        Ok(docs.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let docs = self.docs.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| docs.users.get(id).cloned())
            .collect())
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        if !docs.users.contains_key(&post.author_id) {
            return Err(StoreError::MissingReference("Author"));
        }
        let seq = docs.next_seq();
        docs.posts.insert(post.id, (seq, post.clone()));
        Ok(())
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let docs = self.docs.read().await;
        let mut posts: Vec<&(u64, Post)> = docs.posts.values().collect();
        posts.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });
        Ok(posts.into_iter().map(|(_, post)| post.clone()).collect())
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self
            .docs
            .read()
            .await
            .posts
            .get(&id)
            .map(|(_, post)| post.clone()))
    }

    async fn save_post(&self, post: &Post) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        let (_, stored) = docs
            .posts
            .get_mut(&post.id)
            .ok_or(StoreError::MissingReference("Post"))?;

        // Likes and comment ids are owned by their own operations
        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.media = post.media.clone();
        stored.updated_at = post.updated_at;
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let mut docs = self.docs.write().await;
        let Some((_, post)) = docs.posts.remove(&id) else {
            return Ok(false);
        };

        for comment_id in &post.comment_ids {
            docs.comments.remove(comment_id);
        }
        docs.comments.retain(|_, (_, c)| c.post_id != id);
        Ok(true)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut docs = self.docs.write().await;
        let (_, post) = docs
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::MissingReference("Post"))?;

        if post.likes.contains(&user_id) {
            return Ok(false);
        }
        post.likes.push(user_id);
        Ok(true)
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut docs = self.docs.write().await;
        let Some((_, post)) = docs.posts.get_mut(&post_id) else {
            return Ok(false);
        };

        let before = post.likes.len();
        post.likes.retain(|id| *id != user_id);
        Ok(post.likes.len() != before)
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        let seq = docs.next_seq();
        let (_, post) = docs
            .posts
            .get_mut(&comment.post_id)
            .ok_or(StoreError::MissingReference("Post"))?;

        post.comment_ids.push(comment.id);
        docs.comments.insert(comment.id, (seq, comment.clone()));
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self
            .docs
            .read()
            .await
            .comments
            .get(&id)
            .map(|(_, c)| c.clone()))
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        self.list_comments_for_posts(&[post_id]).await
    }

    async fn list_comments_for_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        let docs = self.docs.read().await;
        let mut comments: Vec<&(u64, Comment)> = docs
            .comments
            .values()
            .filter(|(_, c)| post_ids.contains(&c.post_id))
            .collect();
        comments.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });
        Ok(comments.into_iter().map(|(_, c)| c.clone()).collect())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut docs = self.docs.write().await;
        let Some((_, comment)) = docs.comments.remove(&id) else {
            return Ok(false);
        };

        if let Some((_, post)) = docs.posts.get_mut(&comment.post_id) {
            post.comment_ids.retain(|cid| *cid != id);
        }
        Ok(true)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Business logic layer
///
/// Services validate input, enforce ownership and drive the `BlogStore`.
/// They return read models with authors and comments populated.
pub mod auth;
pub mod comments;
pub mod likes;
pub mod posts;

pub use auth::AuthService;
pub use comments::CommentService;
pub use likes::LikeService;
pub use posts::{PostForm, PostService};

use std::collections::HashMap;
use uuid::Uuid;

use crate::db::BlogStore;
use crate::error::Result;
use crate::models::{AuthorSummary, Comment, CommentView, Post, PostView};

async fn author_map(
    store: &dyn BlogStore,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, AuthorSummary>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    let users = store.find_users_by_ids(&ids).await?;
    Ok(users
        .iter()
        .map(|u| (u.id, AuthorSummary::from(u)))
        .collect())
}

fn to_comment_view(comment: Comment, authors: &HashMap<Uuid, AuthorSummary>) -> CommentView {
    CommentView {
        author: authors.get(&comment.author_id).cloned(),
        id: comment.id,
        content: comment.content,
        post_id: comment.post_id,
        created_at: comment.created_at,
    }
}

/// Comment views with authors populated, keeping input order
pub(crate) async fn comment_views(
    store: &dyn BlogStore,
    comments: Vec<Comment>,
) -> Result<Vec<CommentView>> {
    let authors = author_map(store, comments.iter().map(|c| c.author_id)).await?;

    Ok(comments
        .into_iter()
        .map(|c| to_comment_view(c, &authors))
        .collect())
}

/// Post views with authors and comments (newest first) populated
pub(crate) async fn post_views(store: &dyn BlogStore, posts: Vec<Post>) -> Result<Vec<PostView>> {
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::with_capacity(posts.len());
    for comment in store.list_comments_for_posts(&post_ids).await? {
        comments_by_post.entry(comment.post_id).or_default().push(comment);
    }

    let author_ids = posts.iter().map(|p| p.author_id).chain(
        comments_by_post
            .values()
            .flatten()
            .map(|c| c.author_id),
    );
    let authors = author_map(store, author_ids).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let comments = comments_by_post
                .remove(&post.id)
                .unwrap_or_default()
                .into_iter()
                .map(|c| to_comment_view(c, &authors))
                .collect();

            PostView {
                author: authors.get(&post.author_id).cloned(),
                id: post.id,
                title: post.title,
                content: post.content,
                media: post.media,
                likes: post.likes,
                comments,
                created_at: post.created_at,
                updated_at: post.updated_at,
            }
        })
        .collect())
}

pub(crate) async fn post_view(store: &dyn BlogStore, post: Post) -> Result<PostView> {
    let mut views = post_views(store, vec![post]).await?;
    views
        .pop()
        .ok_or_else(|| crate::error::AppError::Internal("post view assembly failed".into()))
}

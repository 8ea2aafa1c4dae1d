use crate::models::Comment;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    author_id: Uuid,
    post_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            author_id: row.author_id,
            post_id: row.post_id,
            created_at: row.created_at,
        }
    }
}

pub async fn create_comment(pool: &PgPool, comment: &Comment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO comments (id, content, author_id, post_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(comment.id)
    .bind(&comment.content)
    .bind(comment.author_id)
    .bind(comment.post_id)
    .bind(comment.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, content, author_id, post_id, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Comment::from))
}

/// Comments on a post, newest first
pub async fn find_comments_by_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, content, author_id, post_id, created_at
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

/// Comments on a batch of posts in one query, newest first
pub async fn find_comments_by_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<Comment>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, content, author_id, post_id, created_at
        FROM comments
        WHERE post_id = ANY($1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

use crate::models::{Media, MediaType, Post};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: Uuid,
    post_id: Uuid,
    media_type: String,
    url: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PostRef {
    post_id: Uuid,
    ref_id: Uuid,
}

/// Insert a post and its media in one transaction
pub async fn create_post(pool: &PgPool, post: &Post) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO posts (id, title, content, author_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(post.id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(post.author_id)
    .bind(post.created_at)
    .bind(post.updated_at)
    .execute(&mut *tx)
    .await?;

    insert_media(&mut tx, post).await?;

    tx.commit().await
}

/// All posts, newest first, with media, likes and comment ids attached
pub async fn list_posts(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, content, author_id, created_at, updated_at
        FROM posts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}

pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, content, author_id, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Update the post fields and replace its media list
pub async fn update_post(pool: &PgPool, post: &Post) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE posts
        SET title = $2, content = $3, updated_at = $4
        WHERE id = $1
        "#,
    )
    .bind(post.id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(post.updated_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM media WHERE post_id = $1")
        .bind(post.id)
        .execute(&mut *tx)
        .await?;

    insert_media(&mut tx, post).await?;

    tx.commit().await
}

/// Delete a post; comments, media and likes go with it via ON DELETE CASCADE
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_media(tx: &mut Transaction<'_, Postgres>, post: &Post) -> Result<(), sqlx::Error> {
    for (position, media) in post.media.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO media (id, post_id, media_type, url, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(media.id)
        .bind(post.id)
        .bind(media.media_type.as_str())
        .bind(&media.url)
        .bind(position as i32)
        .bind(media.created_at)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

async fn hydrate(pool: &PgPool, rows: Vec<PostRow>) -> Result<Vec<Post>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let media_rows = sqlx::query_as::<_, MediaRow>(
        r#"
        SELECT id, post_id, media_type, url, created_at
        FROM media
        WHERE post_id = ANY($1)
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;

    let like_rows = sqlx::query_as::<_, PostRef>(
        r#"
        SELECT post_id, user_id AS ref_id
        FROM post_likes
        WHERE post_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;

    let comment_rows = sqlx::query_as::<_, PostRef>(
        r#"
        SELECT post_id, id AS ref_id
        FROM comments
        WHERE post_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;

    let mut media: HashMap<Uuid, Vec<Media>> = HashMap::new();
    for row in media_rows {
        let Ok(media_type) = row.media_type.parse::<MediaType>() else {
            tracing::warn!(media_id = %row.id, media_type = %row.media_type, "Skipping media row with unknown type");
            continue;
        };
        media.entry(row.post_id).or_default().push(Media {
            id: row.id,
            media_type,
            url: row.url,
            post_id: row.post_id,
            created_at: row.created_at,
        });
    }

    let mut likes: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in like_rows {
        likes.entry(row.post_id).or_default().push(row.ref_id);
    }

    let mut comments: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in comment_rows {
        comments.entry(row.post_id).or_default().push(row.ref_id);
    }

    Ok(rows
        .into_iter()
        .map(|row| Post {
            media: media.remove(&row.id).unwrap_or_default(),
            likes: likes.remove(&row.id).unwrap_or_default(),
            comment_ids: comments.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect())
}

use crate::models::{NewUser, User, UserRole};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            // The CHECK constraint keeps the column to known roles
            role: row.role.parse().unwrap_or(UserRole::User),
            created_at: row.created_at,
        }
    }
}

/// Insert a user, returning `None` when the email is already taken
pub async fn create_user(pool: &PgPool, new_user: &NewUser) -> Result<Option<User>, sqlx::Error> {
    let result = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, password_hash, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.name)
    .bind(new_user.email.to_lowercase())
    .bind(&new_user.password_hash)
    .bind(new_user.role.as_str())
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, role, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

pub async fn find_users_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, password_hash, role, created_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

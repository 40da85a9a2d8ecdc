//! User operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;
use crate::validation::{validate_email, validate_username};

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, username: &str, email: Option<&str>) -> Result<User> {
    validate_username(username)?;
    if let Some(email) = email {
        validate_email(email)?;
    }

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email)
        VALUES (?, ?)
        RETURNING id, username, email, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: username.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by username.
pub async fn get_user_by_name(pool: &SqlitePool, username: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: username.to_string(),
    })
}

/// Fetch the user with this name, creating it on first sight.
pub async fn get_or_create_user(pool: &SqlitePool, username: &str) -> Result<User> {
    validate_username(username)?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (username)
        VALUES (?)
        ON CONFLICT(username) DO NOTHING
        "#,
    )
    .bind(username)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created user: {}", username);
    }

    get_user_by_name(pool, username).await
}

/// Delete a user by ID. Their messages go with them.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

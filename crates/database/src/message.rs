//! Message persistence.

use sqlx::SqlitePool;

use crate::models::{Message, Sender};
use crate::Result;

/// Store a message for a user and return the saved row.
pub async fn insert_message(
    pool: &SqlitePool,
    user_id: i64,
    sender: Sender,
    text: Option<&str>,
) -> Result<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (user_id, text, sender)
        VALUES (?, ?, ?)
        RETURNING id, user_id, text, sender, timestamp
        "#,
    )
    .bind(user_id)
    .bind(text)
    .bind(sender)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// The last `limit` messages for a user, oldest first.
pub async fn recent_messages(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<Message>> {
    let mut rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, text, sender, timestamp
        FROM messages
        WHERE user_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.reverse();
    Ok(rows)
}

/// Every message for a user, oldest first.
pub async fn list_messages(pool: &SqlitePool, user_id: i64) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, text, sender, timestamp
        FROM messages
        WHERE user_id = ?
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete all messages for a user. Returns the number removed.
pub async fn clear_messages(pool: &SqlitePool, user_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count messages for a user.
pub async fn count_messages(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

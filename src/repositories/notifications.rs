use sqlx::PgPool;

use crate::db::models::Notification;

const COLUMNS: &str = "id, user_id, message, is_read, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    message: &str,
    created_at: time::PrimitiveDateTime,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications (id, user_id, message, is_read, created_at)
         VALUES ($1,$2,$3,FALSE,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(user_id)
    .bind(message)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn mark_all_read(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

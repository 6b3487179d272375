use sqlx::PgPool;

use crate::db::models::TrackOption;

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    created_at: time::PrimitiveDateTime,
) -> Result<TrackOption, sqlx::Error> {
    sqlx::query_as::<_, TrackOption>(&format!(
        "INSERT INTO options (id, name, created_at) VALUES ($1,$2,$3) RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<TrackOption>, sqlx::Error> {
    sqlx::query_as::<_, TrackOption>(&format!("SELECT {COLUMNS} FROM options WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<TrackOption>, sqlx::Error> {
    sqlx::query_as::<_, TrackOption>(&format!("SELECT {COLUMNS} FROM options WHERE name = $1"))
        .bind(name)
        .fetch_optional(pool)
        .await
}

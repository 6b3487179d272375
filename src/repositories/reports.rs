use sqlx::PgPool;

use crate::db::models::Report;
use crate::db::types::ReportStatus;

const COLUMNS: &str = "\
    id, title, tags, hours_worked, status, mark, content, \
    student_id, option_id, created_at, updated_at";

pub(crate) struct CreateReport<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) tags: &'a str,
    pub(crate) hours_worked: f64,
    pub(crate) status: ReportStatus,
    pub(crate) content: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) option_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateReport<'_>) -> Result<Report, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "INSERT INTO reports (
            id, title, tags, hours_worked, status, mark, content,
            student_id, option_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,NULL,$6,$7,$8,$9,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.tags)
    .bind(params.hours_worked)
    .bind(params.status)
    .bind(params.content)
    .bind(params.student_id)
    .bind(params.option_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!("SELECT {COLUMNS} FROM reports WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {COLUMNS} FROM reports WHERE student_id = $1 ORDER BY created_at DESC",
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_option(
    pool: &PgPool,
    option_id: &str,
) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {COLUMNS} FROM reports WHERE option_id = $1 ORDER BY created_at DESC",
    ))
    .bind(option_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports WHERE student_id = $1")
        .bind(student_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_for_student_with_status(
    pool: &PgPool,
    student_id: &str,
    status: ReportStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reports WHERE student_id = $1 AND status = $2",
    )
    .bind(student_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateReport {
    pub(crate) title: Option<String>,
    pub(crate) tags: Option<String>,
    pub(crate) hours_worked: Option<f64>,
    pub(crate) status: Option<ReportStatus>,
    pub(crate) content: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

/// Owner edit. The mark column is deliberately not touched here.
pub(crate) async fn update(pool: &PgPool, id: &str, params: UpdateReport) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE reports SET
            title = COALESCE($1, title),
            tags = COALESCE($2, tags),
            hours_worked = COALESCE($3, hours_worked),
            status = COALESCE($4, status),
            content = COALESCE($5, content),
            updated_at = $6
         WHERE id = $7",
    )
    .bind(params.title)
    .bind(params.tags)
    .bind(params.hours_worked)
    .bind(params.status)
    .bind(params.content)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_mark(
    pool: &PgPool,
    id: &str,
    mark: i32,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE reports SET mark = $1, status = $2, updated_at = $3 WHERE id = $4",
    )
    .bind(mark)
    .bind(ReportStatus::Reviewed)
    .bind(updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<Report, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!("SELECT {COLUMNS} FROM reports WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{CourseProgress, CourseReaction};
use crate::db::types::ReactionEmoji;

const PROGRESS_COLUMNS: &str = "id, student_id, course_id, completed, reacted, assigned_date";
const REACTION_COLUMNS: &str = "id, student_id, course_id, emoji, created_at";

#[derive(Debug)]
pub(crate) enum ReactError {
    /// UNIQUE(student_id, course_id) on course_reactions fired.
    AlreadyReacted,
    Db(sqlx::Error),
}

impl From<sqlx::Error> for ReactError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            ReactError::AlreadyReacted
        } else {
            ReactError::Db(err)
        }
    }
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<CourseProgress>, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM student_course_progress WHERE student_id = $1",
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_for_student_course(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<CourseProgress>, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM student_course_progress
         WHERE student_id = $1 AND course_id = $2",
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn mark_completed(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<CourseProgress, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(&format!(
        "INSERT INTO student_course_progress (id, student_id, course_id, completed, reacted, assigned_date)
         VALUES ($1,$2,$3,TRUE,FALSE,$4)
         ON CONFLICT (student_id, course_id)
         DO UPDATE SET completed = TRUE
         RETURNING {PROGRESS_COLUMNS}",
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(student_id)
    .bind(course_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Reaction insert plus the progress `reacted` flag in one transaction.
/// A duplicate reaction trips the unique constraint and rolls both back.
pub(crate) async fn react(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
    emoji: ReactionEmoji,
    now: time::PrimitiveDateTime,
) -> Result<CourseReaction, ReactError> {
    let mut tx = pool.begin().await?;

    let reaction = sqlx::query_as::<_, CourseReaction>(&format!(
        "INSERT INTO course_reactions (id, student_id, course_id, emoji, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {REACTION_COLUMNS}",
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(student_id)
    .bind(course_id)
    .bind(emoji)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO student_course_progress (id, student_id, course_id, completed, reacted, assigned_date)
         VALUES ($1,$2,$3,FALSE,TRUE,$4)
         ON CONFLICT (student_id, course_id)
         DO UPDATE SET reacted = TRUE",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id)
    .bind(course_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(reaction)
}

pub(crate) async fn find_reaction(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<CourseReaction>, sqlx::Error> {
    sqlx::query_as::<_, CourseReaction>(&format!(
        "SELECT {REACTION_COLUMNS} FROM course_reactions
         WHERE student_id = $1 AND course_id = $2",
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

use sqlx::PgPool;

use crate::db::models::{MentorProfile, StudentProfile};

const STUDENT_COLUMNS: &str = "id, user_id, option_id, created_at";
const MENTOR_COLUMNS: &str = "id, user_id, option_id, expertise, created_at";

pub(crate) async fn find_student_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<StudentProfile>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfile>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1",
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_mentor_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<MentorProfile>, sqlx::Error> {
    sqlx::query_as::<_, MentorProfile>(&format!(
        "SELECT {MENTOR_COLUMNS} FROM mentor_profiles WHERE user_id = $1",
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_mentor_for_option(
    pool: &PgPool,
    option_id: &str,
) -> Result<Option<MentorProfile>, sqlx::Error> {
    sqlx::query_as::<_, MentorProfile>(&format!(
        "SELECT {MENTOR_COLUMNS} FROM mentor_profiles WHERE option_id = $1",
    ))
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

/// True when the user already carries a student or mentor profile.
pub(crate) async fn has_any_profile(pool: &PgPool, user_id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM student_profiles WHERE user_id = $1
         UNION ALL
         SELECT 1 FROM mentor_profiles WHERE user_id = $1
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

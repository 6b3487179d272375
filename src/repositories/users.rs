use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    id, username, email, hashed_password, first_name, last_name, \
    phone, bio, skills, role, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE username = $1 OR email = $2")
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) username: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) phone: &'a str,
    pub(crate) role: UserRole,
    pub(crate) option_id: &'a str,
    pub(crate) expertise: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

/// Inserts the user row together with its role profile in one transaction.
/// Rolls back as a unit, so a user can never end up without a profile.
pub(crate) async fn create_with_profile(
    pool: &PgPool,
    params: CreateUser<'_>,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, username, email, hashed_password, first_name, last_name,
            phone, bio, skills, role, is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,'','',$8,TRUE,$9,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.username)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.role)
    .bind(params.created_at)
    .fetch_one(&mut *tx)
    .await?;

    match params.role {
        UserRole::Student => {
            sqlx::query(
                "INSERT INTO student_profiles (id, user_id, option_id, created_at)
                 VALUES ($1,$2,$3,$4)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&user.id)
            .bind(params.option_id)
            .bind(params.created_at)
            .execute(&mut *tx)
            .await?;
        }
        UserRole::Mentor => {
            sqlx::query(
                "INSERT INTO mentor_profiles (id, user_id, option_id, expertise, created_at)
                 VALUES ($1,$2,$3,$4,$5)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&user.id)
            .bind(params.option_id)
            .bind(params.expertise)
            .bind(params.created_at)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(user)
}

pub(crate) struct UpdateProfileFields {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) skills: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update_profile_fields(
    pool: &PgPool,
    id: &str,
    params: UpdateProfileFields,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            username = COALESCE($1, username),
            email = COALESCE($2, email),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            phone = COALESCE($5, phone),
            bio = COALESCE($6, bio),
            skills = COALESCE($7, skills),
            updated_at = $8
         WHERE id = $9",
    )
    .bind(params.username)
    .bind(params.email)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.bio)
    .bind(params.skills)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Students sharing an option, for the classmates listing.
pub(crate) async fn list_students_for_option(
    pool: &PgPool,
    option_id: &str,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.hashed_password, u.first_name, u.last_name,
                u.phone, u.bio, u.skills, u.role, u.is_active, u.created_at, u.updated_at
         FROM users u
         JOIN student_profiles sp ON sp.user_id = u.id
         WHERE sp.option_id = $1
         ORDER BY u.first_name, u.last_name",
    )
    .bind(option_id)
    .fetch_all(pool)
    .await
}

use sqlx::PgPool;

use crate::db::models::WorkItem;

const COLUMNS: &str = "id, name, content, due_date, option_id, mentor_id, created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkItemKind {
    Task,
    Project,
}

impl WorkItemKind {
    fn table(self) -> &'static str {
        match self {
            WorkItemKind::Task => "tasks",
            WorkItemKind::Project => "projects",
        }
    }

    fn assignment_table(self) -> &'static str {
        match self {
            WorkItemKind::Task => "task_assignments",
            WorkItemKind::Project => "project_assignments",
        }
    }

    fn assignment_fk(self) -> &'static str {
        match self {
            WorkItemKind::Task => "task_id",
            WorkItemKind::Project => "project_id",
        }
    }
}

pub(crate) struct CreateWorkItem<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) content: &'a str,
    pub(crate) due_date: Option<time::PrimitiveDateTime>,
    pub(crate) option_id: &'a str,
    pub(crate) mentor_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

#[derive(Debug)]
pub(crate) enum AssignError {
    /// One of the selected students has no profile in the item's option.
    StudentOutsideOption,
    Db(sqlx::Error),
}

impl From<sqlx::Error> for AssignError {
    fn from(err: sqlx::Error) -> Self {
        AssignError::Db(err)
    }
}

/// Creates the item and its assignment rows in one transaction. Every
/// selected student must hold a student profile in the item's option;
/// otherwise nothing is committed.
pub(crate) async fn create_with_assignments(
    pool: &PgPool,
    kind: WorkItemKind,
    params: CreateWorkItem<'_>,
    student_ids: &[String],
) -> Result<WorkItem, AssignError> {
    let mut tx = pool.begin().await?;

    let in_option: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_profiles
         WHERE option_id = $1 AND user_id = ANY($2)",
    )
    .bind(params.option_id)
    .bind(student_ids)
    .fetch_one(&mut *tx)
    .await?;

    if in_option != student_ids.len() as i64 {
        return Err(AssignError::StudentOutsideOption);
    }

    let item = sqlx::query_as::<_, WorkItem>(&format!(
        "INSERT INTO {} (id, name, content, due_date, option_id, mentor_id, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
        kind.table(),
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.content)
    .bind(params.due_date)
    .bind(params.option_id)
    .bind(params.mentor_id)
    .bind(params.created_at)
    .fetch_one(&mut *tx)
    .await?;

    for student_id in student_ids {
        sqlx::query(&format!(
            "INSERT INTO {} ({}, student_id, assigned_at) VALUES ($1,$2,$3)",
            kind.assignment_table(),
            kind.assignment_fk(),
        ))
        .bind(&item.id)
        .bind(student_id)
        .bind(params.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(item)
}

pub(crate) async fn list_for_mentor(
    pool: &PgPool,
    kind: WorkItemKind,
    mentor_id: &str,
) -> Result<Vec<WorkItem>, sqlx::Error> {
    sqlx::query_as::<_, WorkItem>(&format!(
        "SELECT {COLUMNS} FROM {} WHERE mentor_id = $1 ORDER BY created_at DESC",
        kind.table(),
    ))
    .bind(mentor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    kind: WorkItemKind,
    student_id: &str,
) -> Result<Vec<WorkItem>, sqlx::Error> {
    sqlx::query_as::<_, WorkItem>(&format!(
        "SELECT i.id, i.name, i.content, i.due_date, i.option_id, i.mentor_id, i.created_at
         FROM {} i
         JOIN {} a ON a.{} = i.id
         WHERE a.student_id = $1
         ORDER BY i.created_at DESC",
        kind.table(),
        kind.assignment_table(),
        kind.assignment_fk(),
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_assignees(
    pool: &PgPool,
    kind: WorkItemKind,
    item_ids: &[String],
) -> Result<Vec<(String, String)>, sqlx::Error> {
    if item_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, (String, String)>(&format!(
        "SELECT {}, student_id FROM {} WHERE {} = ANY($1)",
        kind.assignment_fk(),
        kind.assignment_table(),
        kind.assignment_fk(),
    ))
    .bind(item_ids)
    .fetch_all(pool)
    .await
}

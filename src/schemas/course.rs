use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{Course, CourseProgress};
use crate::db::types::ReactionEmoji;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseCreate {
    pub(crate) title: String,
    #[serde(alias = "orderIndex")]
    pub(crate) order_index: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReactRequest {
    pub(crate) emoji: ReactionEmoji,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReactResponse {
    pub(crate) status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl ReactResponse {
    pub(crate) fn ok() -> Self {
        Self { status: "ok", error: None }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self { status: "error", error: Some(message.into()) }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order_index: i32,
    pub(crate) option_id: String,
    pub(crate) created_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            order_index: course.order_index,
            option_id: course.option_id,
            created_at: format_primitive(course.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseWithProgress {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) completed: bool,
    pub(crate) reacted: bool,
}

impl CourseWithProgress {
    pub(crate) fn from_db(course: Course, progress: Option<&CourseProgress>) -> Self {
        Self {
            course: CourseResponse::from_db(course),
            completed: progress.map(|p| p.completed).unwrap_or(false),
            reacted: progress.map(|p| p.reacted).unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseListResponse {
    pub(crate) courses: Vec<CourseWithProgress>,
    /// First course in option order without a completed progress record.
    pub(crate) next_course_id: Option<String>,
}

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Report;
use crate::db::types::ReportStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct ReportCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) tags: String,
    #[serde(default)]
    #[serde(alias = "hoursWorked")]
    pub(crate) hours_worked: f64,
    pub(crate) status: ReportStatus,
    #[serde(default)]
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) tags: Option<String>,
    #[serde(default)]
    #[serde(alias = "hoursWorked")]
    pub(crate) hours_worked: Option<f64>,
    #[serde(default)]
    pub(crate) status: Option<ReportStatus>,
    #[serde(default)]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkRequest {
    pub(crate) mark: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) tags: String,
    pub(crate) hours_worked: f64,
    pub(crate) status: ReportStatus,
    pub(crate) mark: Option<i32>,
    pub(crate) content: String,
    pub(crate) summary: String,
    pub(crate) student_id: String,
    pub(crate) option_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ReportResponse {
    pub(crate) fn from_db(report: Report) -> Self {
        let summary = summarize(&report.content);
        Self {
            id: report.id,
            title: report.title,
            tags: report.tags,
            hours_worked: report.hours_worked,
            status: report.status,
            mark: report.mark,
            content: report.content,
            summary,
            student_id: report.student_id,
            option_id: report.option_id,
            created_at: format_primitive(report.created_at),
            updated_at: format_primitive(report.updated_at),
        }
    }
}

/// First ten words of the content, used as a list preview.
pub(crate) fn summarize(content: &str) -> String {
    content.split_whitespace().take(10).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::summarize;

    #[test]
    fn summary_truncates_to_ten_words() {
        let content = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(summarize(content), "one two three four five six seven eight nine ten");
    }

    #[test]
    fn summary_collapses_whitespace() {
        assert_eq!(summarize("  a\n b\tc  "), "a b c");
    }
}

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::core::time::format_primitive;
use crate::db::models::WorkItem;

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemCreate {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default)]
    #[serde(alias = "dueDate", deserialize_with = "deserialize_due_date_flexible")]
    pub(crate) due_date: Option<PrimitiveDateTime>,
    #[serde(alias = "studentIds")]
    pub(crate) student_ids: Vec<String>,
}

fn parse_due_date_flexible(raw: &str) -> Option<PrimitiveDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = value.to_offset(UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    // Frontend's datetime-local often sends without timezone.
    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value);
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value);
    }

    None
}

fn deserialize_due_date_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<PrimitiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_due_date_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkItemResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) content: String,
    pub(crate) due_date: Option<String>,
    pub(crate) option_id: String,
    pub(crate) mentor_id: String,
    pub(crate) student_ids: Vec<String>,
    pub(crate) created_at: String,
}

impl WorkItemResponse {
    pub(crate) fn from_db(item: WorkItem, student_ids: Vec<String>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            content: item.content,
            due_date: item.due_date.map(format_primitive),
            option_id: item.option_id,
            mentor_id: item.mentor_id,
            student_ids,
            created_at: format_primitive(item.created_at),
        }
    }
}

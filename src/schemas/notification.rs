use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Notification;

#[derive(Debug, Serialize)]
pub(crate) struct NotificationResponse {
    pub(crate) id: String,
    pub(crate) message: String,
    pub(crate) is_read: bool,
    pub(crate) created_at: String,
}

impl NotificationResponse {
    pub(crate) fn from_db(notification: Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message,
            is_read: notification.is_read,
            created_at: format_primitive(notification.created_at),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::models::common::PageQuery;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Match,
    System,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct UnreadCount {
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFilter {
    #[serde(rename = "unreadOnly", skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
    #[serde(flatten)]
    pub page: PageQuery,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::models::common::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "coachId", default)]
    pub coach_id: Option<Uuid>,
    #[serde(rename = "athleteCount", default)]
    pub athlete_count: Option<u32>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TeamPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(rename = "coachId", skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

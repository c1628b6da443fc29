/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::models::common::PageQuery;

/// Court position of an athlete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Setter,
    OutsideHitter,
    OppositeHitter,
    MiddleBlocker,
    Libero,
    DefensiveSpecialist,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Athlete {
    pub id: Uuid,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "jerseyNumber", default)]
    pub jersey_number: Option<u8>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(rename = "teamId", default)]
    pub team_id: Option<Uuid>,
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "heightCm", default)]
    pub height_cm: Option<u16>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Athlete {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body for creating or updating an athlete
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AthletePayload {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "jerseyNumber", skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(rename = "teamId", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(rename = "birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "heightCm", skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AthleteFilter {
    #[serde(rename = "teamId", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub page: PageQuery,
}

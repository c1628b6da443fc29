/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::application::models::common::PageQuery;

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSet {
    pub id: Uuid,
    pub number: u8,
    #[serde(rename = "homeScore")]
    pub home_score: u16,
    #[serde(rename = "awayScore")]
    pub away_score: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "teamId")]
    pub team_id: Uuid,
    pub opponent: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "isHome", default)]
    pub is_home: bool,
    pub status: MatchStatus,
    #[serde(default)]
    pub sets: Vec<MatchSet>,
    #[serde(rename = "setsWon", default)]
    pub sets_won: u8,
    #[serde(rename = "setsLost", default)]
    pub sets_lost: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchPayload {
    #[serde(rename = "teamId")]
    pub team_id: Uuid,
    pub opponent: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "isHome")]
    pub is_home: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetPayload {
    pub number: u8,
    #[serde(rename = "homeScore")]
    pub home_score: u16,
    #[serde(rename = "awayScore")]
    pub away_score: u16,
}

/// Rally action recorded during a match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Serve,
    Reception,
    Set,
    Attack,
    Block,
    Dig,
    Error,
}

/// Outcome of an action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Point,
    Error,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchAction {
    pub id: Uuid,
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    #[serde(rename = "setId", default)]
    pub set_id: Option<Uuid>,
    #[serde(rename = "athleteId", default)]
    pub athlete_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub result: ActionResult,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionPayload {
    #[serde(rename = "setId", skip_serializing_if = "Option::is_none")]
    pub set_id: Option<Uuid>,
    #[serde(rename = "athleteId", skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub result: ActionResult,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchFilter {
    #[serde(rename = "teamId", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// Report formats the export endpoint can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A downloaded match report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Extracts `filename` from a `Content-Disposition` header value.
pub(crate) fn file_name_from_disposition(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

//! Statistics DTOs. Every figure here is computed by the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionTotals {
    pub serves: u32,
    pub aces: u32,
    pub service_errors: u32,
    pub receptions: u32,
    pub reception_errors: u32,
    pub attacks: u32,
    pub kills: u32,
    pub attack_errors: u32,
    pub blocks: u32,
    pub digs: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteStatLine {
    pub athlete_id: Uuid,
    #[serde(default)]
    pub athlete_name: Option<String>,
    #[serde(default)]
    pub totals: ActionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatLine {
    pub set_number: u8,
    #[serde(default)]
    pub totals: ActionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub match_id: Uuid,
    #[serde(default)]
    pub totals: ActionTotals,
    #[serde(default)]
    pub by_athlete: Vec<AthleteStatLine>,
    #[serde(default)]
    pub by_set: Vec<SetStatLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteStatistics {
    pub athlete_id: Uuid,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub totals: ActionTotals,
    #[serde(default)]
    pub attack_efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    pub team_id: Uuid,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub sets_won: u32,
    #[serde(default)]
    pub sets_lost: u32,
    #[serde(default)]
    pub totals: ActionTotals,
}

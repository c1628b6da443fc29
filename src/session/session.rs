/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Coach,
    Statistician,
    Athlete,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            UserRole::Admin => "admin",
            UserRole::Coach => "coach",
            UserRole::Statistician => "statistician",
            UserRole::Athlete => "athlete",
            UserRole::Unknown => "unknown",
        };
        write!(f, "{role}")
    }
}

/// Profile of the logged-in user, persisted as JSON under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: UserRole,
    #[serde(rename = "teamId", default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn new(access_token: String, refresh_token: String, user: UserProfile) -> Self {
        Self {
            access_token,
            refresh_token,
            user,
        }
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"id\":\"{}\",\"email\":\"{}\",\"firstName\":\"{}\",\"lastName\":\"{}\",\"role\":\"{}\"}}",
            self.id, self.email, self.first_name, self.last_name, self.role
        )
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"access_token\":\"[REDACTED]\",\"refresh_token\":\"[REDACTED]\",\"user\":{}}}",
            self.user
        )
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::constants::REFRESH_ENDPOINT;
use crate::error::{ApiError, AppError};
use crate::session::interface::TokenRefresher;
use crate::session::session::{Session, UserProfile};

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session::new(response.access_token, response.refresh_token, response.user)
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

/// The refresh endpoint only rotates the access token.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Calls `POST /auth/refresh` with a bare HTTP client.
#[derive(Debug, Clone)]
pub struct RestTokenRefresher {
    client: Client,
    base_url: String,
}

impl RestTokenRefresher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TokenRefresher for RestTokenRefresher {
    #[instrument(skip(self, refresh_token))]
    async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let url = format!("{}{}", self.base_url, REFRESH_ENDPOINT);
        debug!("Sending refresh request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Token refresh rejected with status {}", status);
            return Err(AppError::Server(ApiError::from_response(status.as_u16(), &body)));
        }

        let refreshed: RefreshResponse = serde_json::from_str(&body)?;
        if refreshed.access_token.is_empty() {
            return Err(AppError::Deserialization(
                "refresh response carried an empty access token".to_string(),
            ));
        }
        Ok(refreshed.access_token)
    }
}

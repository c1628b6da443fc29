use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_KEY};
use crate::error::AppError;
use crate::session::jwt;
use crate::session::session::{Session, UserProfile};
use crate::storage::SessionStorage;

/// Sole owner of the persisted session.
///
/// Empty strings in storage are read back as absent values.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.storage.get(key).await?.filter(|v| !v.is_empty()))
    }

    pub async fn access_token(&self) -> Result<Option<String>, AppError> {
        self.read(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, AppError> {
        self.read(REFRESH_TOKEN_KEY).await
    }

    /// Stored profile. A corrupt entry is logged and reported as absent.
    pub async fn user(&self) -> Result<Option<UserProfile>, AppError> {
        let Some(raw) = self.read(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Stored user profile is unreadable: {}", e);
                Ok(None)
            }
        }
    }

    /// The full session, only when all three parts are present.
    pub async fn session(&self) -> Result<Option<Session>, AppError> {
        let access = self.access_token().await?;
        let refresh = self.refresh_token().await?;
        let user = self.user().await?;
        Ok(match (access, refresh, user) {
            (Some(access), Some(refresh), Some(user)) => Some(Session::new(access, refresh, user)),
            _ => None,
        })
    }

    pub async fn save_session(&self, session: &Session) -> Result<(), AppError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, &session.access_token)
            .await?;
        self.storage
            .set(REFRESH_TOKEN_KEY, &session.refresh_token)
            .await?;
        self.set_user(&session.user).await?;
        info!("Session stored for {}", session.user.email);
        Ok(())
    }

    /// Replaces the access token, leaving the refresh token untouched.
    pub async fn set_access_token(&self, token: &str) -> Result<(), AppError> {
        self.storage.set(ACCESS_TOKEN_KEY, token).await
    }

    pub async fn set_user(&self, user: &UserProfile) -> Result<(), AppError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &raw).await
    }

    /// Drops access token, refresh token and user together.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.storage.remove_many(&SESSION_KEYS).await?;
        debug!("Session cleared");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.access_token().await?.is_some())
    }

    /// Local clock check of the stored access token. No token counts as expired.
    pub async fn is_access_token_expired(&self) -> Result<bool, AppError> {
        Ok(match self.access_token().await? {
            Some(token) => jwt::is_token_expired(&token),
            None => true,
        })
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

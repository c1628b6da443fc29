use async_trait::async_trait;

use crate::error::AppError;

/// Exchanges a refresh token for a new access token.
///
/// The coordinator calls this outside of its own 401 handling, so an
/// implementation must never route through the authenticated client.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<String, AppError>;
}

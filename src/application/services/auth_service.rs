use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::models::auth::{
        ChangePasswordRequest, ForgotPasswordRequest, LogoutRequest, MessageResponse,
        ResetPasswordRequest,
    },
    application::validation::{
        validate_email, validate_password, validate_password_confirmation, validate_required,
    },
    error::AppError,
    session::auth::{LoginRequest, LoginResponse},
    session::session::{Session, UserProfile},
    session::token_store::TokenStore,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

/// Login, logout and password flows.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticates and persists the new session.
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError>;

    /// Ends the session on the backend (best effort) and always clears it locally.
    async fn logout(&self) -> Result<(), AppError>;

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, AppError>;

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<MessageResponse, AppError>;

    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<MessageResponse, AppError>;

    /// Fetches the profile from the backend and refreshes the stored copy.
    async fn me(&self) -> Result<UserProfile, AppError>;

    async fn current_user(&self) -> Result<Option<UserProfile>, AppError>;

    async fn is_authenticated(&self) -> Result<bool, AppError>;
}

pub struct AuthServiceImpl<T: HttpClient> {
    client: Arc<T>,
    tokens: TokenStore,
}

impl<T: HttpClient> AuthServiceImpl<T> {
    pub fn new(client: Arc<T>, tokens: TokenStore) -> Self {
        Self { client, tokens }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> AuthService for AuthServiceImpl<T> {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        validate_email("email", email)?;
        validate_required("password", password)?;

        let request = ApiRequest::post("/auth/login")
            .json(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })?
            .public();
        let response: LoginResponse = self.client.send(request).await?;

        let session = Session::from(response);
        self.tokens.save_session(&session).await?;
        info!("Logged in as {} ({})", session.user.email, session.user.role);
        Ok(session.user)
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), AppError> {
        let refresh_token = self.tokens.refresh_token().await?;
        let request = ApiRequest::post("/auth/logout")
            .json(&LogoutRequest { refresh_token })?
            .public();

        let result: Result<IgnoredAny, AppError> = self.client.send(request).await;
        if let Err(e) = result {
            warn!("Backend logout failed, clearing session anyway: {}", e);
        }
        self.tokens.clear().await?;
        info!("Logged out");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, AppError> {
        validate_email("email", email)?;

        let request = ApiRequest::post("/auth/forgot-password")
            .json(&ForgotPasswordRequest {
                email: email.trim().to_string(),
            })?
            .public();
        let response: Option<MessageResponse> = self.client.send(request).await?;
        debug!("Password reset requested for {}", email);
        Ok(response.unwrap_or_default())
    }

    #[instrument(skip(self, token, new_password, confirmation))]
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<MessageResponse, AppError> {
        validate_required("token", token)?;
        validate_password("newPassword", new_password)?;
        validate_password_confirmation(new_password, confirmation)?;

        let request = ApiRequest::post("/auth/reset-password")
            .json(&ResetPasswordRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            })?
            .public();
        let response: Option<MessageResponse> = self.client.send(request).await?;
        Ok(response.unwrap_or_default())
    }

    #[instrument(skip(self, current_password, new_password, confirmation))]
    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<MessageResponse, AppError> {
        validate_required("currentPassword", current_password)?;
        validate_password("newPassword", new_password)?;
        validate_password_confirmation(new_password, confirmation)?;

        let request = ApiRequest::post("/auth/change-password").json(&ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })?;
        let response: Option<MessageResponse> = self.client.send(request).await?;
        Ok(response.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn me(&self) -> Result<UserProfile, AppError> {
        let user: UserProfile = self.client.send(ApiRequest::get("/auth/me")).await?;
        self.tokens.set_user(&user).await?;
        Ok(user)
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, AppError> {
        self.tokens.user().await
    }

    async fn is_authenticated(&self) -> Result<bool, AppError> {
        self.tokens.is_authenticated().await
    }
}

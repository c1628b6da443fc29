use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::session::auth::RestTokenRefresher;
use crate::session::interface::TokenRefresher;
use crate::session::jwt;
use crate::session::token_store::TokenStore;
use crate::transport::headers::{attach_bearer, default_headers, header_string};
use crate::transport::navigator::LoginNavigator;
use crate::transport::refresh::{wait_for, RefreshCoordinator, RefreshTicket};
use crate::transport::request::ApiRequest;

/// Raw body of a successful call, kept for binary downloads.
#[derive(Debug, Clone)]
pub struct BinaryResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub bytes: Vec<u8>,
}

/// Seam between the resource services and the transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and decodes a JSON body. Empty bodies decode as `null`,
    /// so `()` and `Option<T>` work for endpoints that answer `204`.
    async fn send<T: DeserializeOwned + Send>(&self, request: ApiRequest) -> Result<T, AppError>;

    async fn download(&self, request: ApiRequest) -> Result<BinaryResponse, AppError>;
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Attaches the session's bearer token to every call and recovers from
/// access-token expiry with a single coordinated refresh.
pub struct AuthenticatedClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    refresher: Arc<dyn TokenRefresher>,
    navigator: Arc<dyn LoginNavigator>,
    refresh: RefreshCoordinator,
}

impl AuthenticatedClient {
    pub fn new(
        config: &Config,
        tokens: TokenStore,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()
            .map_err(|e| {
                AppError::RequestSetup(ApiError::request_setup(format!(
                    "failed to build HTTP client: {e}"
                )))
            })?;
        let refresher = Arc::new(RestTokenRefresher::new(
            client.clone(),
            &config.rest_api.base_url,
        ));
        Ok(Self::with_refresher(
            client,
            &config.rest_api.base_url,
            tokens,
            refresher,
            navigator,
        ))
    }

    pub fn with_refresher(
        client: Client,
        base_url: &str,
        tokens: TokenStore,
        refresher: Arc<dyn TokenRefresher>,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            refresher,
            navigator,
            refresh: RefreshCoordinator::new(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Clears the stored session and fires the login redirect.
    pub async fn end_session(&self) {
        if let Err(e) = self.tokens.clear().await {
            error!("Failed to clear session: {}", e);
        }
        self.navigator.navigate_to_login();
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse, AppError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("Sending {} request to {}", request.method, url);

        let mut headers = request.headers.clone();
        let token = self.tokens.access_token().await?;
        attach_bearer(&mut headers, token.as_deref())?;

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let built = builder.build().map_err(|e| {
            AppError::RequestSetup(ApiError::request_setup(format!(
                "failed to build request for {url}: {e}"
            )))
        })?;

        let response = self.client.execute(built).await.map_err(|e| {
            error!("No response from {}: {}", url, e);
            AppError::Network(ApiError::network(e.to_string()))
        })?;
        Self::read(response).await
    }

    async fn read(response: Response) -> Result<RawResponse, AppError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(ApiError::network(format!(
                "failed to read response body: {e}"
            ))))?
            .to_vec();
        debug!("Response Status: {}", status);
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Dispatches the request, running 401 recovery at most once.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, AppError> {
        let response = self.dispatch(&request).await?;

        if response.status != StatusCode::UNAUTHORIZED || request.public || request.is_retried() {
            return Self::check(response, &request);
        }

        debug!("Received 401 for {} {}", request.method, request.path);
        let token = self.recover_from_unauthorized().await?;
        let replay = request.replay_with(&token)?;
        let response = self.dispatch(&replay).await?;
        Self::check(response, &replay)
    }

    /// Maps non-2xx responses onto the error taxonomy.
    fn check(response: RawResponse, request: &ApiRequest) -> Result<RawResponse, AppError> {
        if response.status.is_success() {
            return Ok(response);
        }
        let status = response.status.as_u16();
        if response.status == StatusCode::UNAUTHORIZED && !request.public {
            warn!(
                "{} {} still unauthorized after token refresh",
                request.method, request.path
            );
            return Err(AppError::Unauthorized);
        }

        let body = String::from_utf8_lossy(&response.body);
        error!(
            "API request failed. Status: {}, Body: {}",
            status, body
        );
        Err(AppError::Server(ApiError::from_response(status, &body)))
    }

    /// Decides what a 401 means and, when a refresh is warranted, returns the
    /// access token to replay with.
    ///
    /// Leadership is settled before the session is read: a caller arriving
    /// while a refresh runs is queued without reading storage.
    async fn recover_from_unauthorized(&self) -> Result<String, AppError> {
        match self.refresh.join() {
            RefreshTicket::Waiter(receiver) => wait_for(receiver).await,
            RefreshTicket::Leader(guard) => {
                let outcome = self.lead_recovery().await;
                guard.settle(outcome.clone());
                outcome
            }
        }
    }

    /// Runs while this caller holds the refresh lead. Every storage write and
    /// the login redirect happen before the outcome is handed to waiters.
    async fn lead_recovery(&self) -> Result<String, AppError> {
        let Some(refresh_token) = self.tokens.refresh_token().await? else {
            warn!("No refresh token available, ending session");
            self.end_session().await;
            return Err(AppError::Unauthorized);
        };

        if let Some(access_token) = self.tokens.access_token().await? {
            if !jwt::is_token_expired(&access_token) {
                warn!("Server rejected an access token that has not expired");
                return Err(AppError::Unauthorized);
            }
        }

        match self.refresh_access_token(&refresh_token).await {
            Ok(token) => {
                info!("Access token refreshed");
                Ok(token)
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.end_session().await;
                Err(AppError::SessionExpired)
            }
        }
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let token = self.refresher.refresh(refresh_token).await?;
        self.tokens.set_access_token(&token).await?;
        Ok(token)
    }
}

#[async_trait]
impl HttpClient for AuthenticatedClient {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send<T: DeserializeOwned + Send>(&self, request: ApiRequest) -> Result<T, AppError> {
        let response = self.execute(request).await?;
        if response.body.is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            error!("Failed to deserialize response body: {}", e);
            AppError::Deserialization(e.to_string())
        })
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn download(&self, request: ApiRequest) -> Result<BinaryResponse, AppError> {
        let response = self.execute(request).await?;
        Ok(BinaryResponse {
            status: response.status.as_u16(),
            content_type: header_string(&response.headers, header::CONTENT_TYPE),
            content_disposition: header_string(&response.headers, header::CONTENT_DISPOSITION),
            bytes: response.body,
        })
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}

/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/
use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::application::services::{
    AthleteService, AthleteServiceImpl, AuthService, AuthServiceImpl, MatchService,
    MatchServiceImpl, NotificationService, NotificationServiceImpl, TeamService, TeamServiceImpl,
    UserService, UserServiceImpl,
};
use crate::config::Config;
use crate::error::AppError;
use crate::session::token_store::TokenStore;
use crate::storage::{FileStorage, SessionStorage};
use crate::transport::http_client::AuthenticatedClient;
use crate::transport::navigator::{LoggingNavigator, LoginNavigator};

/// Entry point wiring one authenticated transport into every resource service.
///
/// All services share the same [`AuthenticatedClient`], so a token refresh
/// triggered by any of them is seen by all.
pub struct VolleyClient {
    http: Arc<AuthenticatedClient>,
    auth: AuthServiceImpl<AuthenticatedClient>,
    athletes: AthleteServiceImpl<AuthenticatedClient>,
    teams: TeamServiceImpl<AuthenticatedClient>,
    matches: MatchServiceImpl<AuthenticatedClient>,
    users: UserServiceImpl<AuthenticatedClient>,
    notifications: NotificationServiceImpl<AuthenticatedClient>,
}

impl VolleyClient {
    pub fn new(
        config: &Config,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Result<Self, AppError> {
        let tokens = TokenStore::new(storage);
        let http = Arc::new(AuthenticatedClient::new(config, tokens.clone(), navigator)?);
        info!("Volley client ready for {}", config.rest_api.base_url);

        Ok(Self {
            auth: AuthServiceImpl::new(http.clone(), tokens),
            athletes: AthleteServiceImpl::new(http.clone()),
            teams: TeamServiceImpl::new(http.clone()),
            matches: MatchServiceImpl::new(http.clone()),
            users: UserServiceImpl::new(http.clone()),
            notifications: NotificationServiceImpl::new(http.clone()),
            http,
        })
    }

    /// Builds a client whose session lives in the file named by the config
    /// and whose login redirects only go to the log.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let storage = FileStorage::open(&config.storage.path).await?;
        Self::new(config, Arc::new(storage), Arc::new(LoggingNavigator))
    }

    pub fn auth(&self) -> &dyn AuthService {
        &self.auth
    }

    pub fn athletes(&self) -> &dyn AthleteService {
        &self.athletes
    }

    pub fn teams(&self) -> &dyn TeamService {
        &self.teams
    }

    pub fn matches(&self) -> &dyn MatchService {
        &self.matches
    }

    pub fn users(&self) -> &dyn UserService {
        &self.users
    }

    pub fn notifications(&self) -> &dyn NotificationService {
        &self.notifications
    }

    pub fn http(&self) -> &Arc<AuthenticatedClient> {
        &self.http
    }

    pub fn tokens(&self) -> &TokenStore {
        self.http.tokens()
    }
}

impl fmt::Debug for VolleyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolleyClient")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    application::models::athlete::Athlete,
    application::models::common::Paginated,
    application::models::statistics::TeamStatistics,
    application::models::team::{Team, TeamFilter, TeamPayload},
    application::validation::Validate,
    error::AppError,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

#[async_trait]
pub trait TeamService: Send + Sync {
    async fn list(&self, filter: &TeamFilter) -> Result<Paginated<Team>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Team, AppError>;

    async fn create(&self, payload: &TeamPayload) -> Result<Team, AppError>;

    async fn update(&self, id: Uuid, payload: &TeamPayload) -> Result<Team, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Current roster of the team.
    async fn athletes(&self, id: Uuid) -> Result<Vec<Athlete>, AppError>;

    async fn statistics(&self, id: Uuid) -> Result<TeamStatistics, AppError>;
}

pub struct TeamServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> TeamServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> TeamService for TeamServiceImpl<T> {
    async fn list(&self, filter: &TeamFilter) -> Result<Paginated<Team>, AppError> {
        info!("Listing teams");
        let result: Paginated<Team> = self
            .client
            .send(ApiRequest::get("/teams").query(filter)?)
            .await?;
        debug!("Teams fetched: {} of {}", result.data.len(), result.total);
        Ok(result)
    }

    async fn get(&self, id: Uuid) -> Result<Team, AppError> {
        self.client.send(ApiRequest::get(format!("/teams/{id}"))).await
    }

    async fn create(&self, payload: &TeamPayload) -> Result<Team, AppError> {
        payload.validate()?;
        let team: Team = self
            .client
            .send(ApiRequest::post("/teams").json(payload)?)
            .await?;
        info!("Team created: {} ({})", team.name, team.id);
        Ok(team)
    }

    async fn update(&self, id: Uuid, payload: &TeamPayload) -> Result<Team, AppError> {
        payload.validate()?;
        self.client
            .send(ApiRequest::put(format!("/teams/{id}")).json(payload)?)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!("/teams/{id}")))
            .await?;
        info!("Team deleted: {}", id);
        Ok(())
    }

    async fn athletes(&self, id: Uuid) -> Result<Vec<Athlete>, AppError> {
        let athletes: Vec<Athlete> = self
            .client
            .send(ApiRequest::get(format!("/teams/{id}/athletes")))
            .await?;
        debug!("Team {} has {} athletes", id, athletes.len());
        Ok(athletes)
    }

    async fn statistics(&self, id: Uuid) -> Result<TeamStatistics, AppError> {
        self.client
            .send(ApiRequest::get(format!("/teams/{id}/statistics")))
            .await
    }
}

use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    application::models::athlete::{Athlete, AthleteFilter, AthletePayload},
    application::models::common::Paginated,
    application::models::statistics::AthleteStatistics,
    application::validation::Validate,
    error::AppError,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

/// Roster management for athletes
#[async_trait]
pub trait AthleteService: Send + Sync {
    async fn list(&self, filter: &AthleteFilter) -> Result<Paginated<Athlete>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Athlete, AppError>;

    async fn create(&self, payload: &AthletePayload) -> Result<Athlete, AppError>;

    async fn update(&self, id: Uuid, payload: &AthletePayload) -> Result<Athlete, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Aggregated figures for one athlete, as computed by the API.
    async fn statistics(&self, id: Uuid) -> Result<AthleteStatistics, AppError>;
}

pub struct AthleteServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> AthleteServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> AthleteService for AthleteServiceImpl<T> {
    async fn list(&self, filter: &AthleteFilter) -> Result<Paginated<Athlete>, AppError> {
        info!("Listing athletes");
        let result: Paginated<Athlete> = self
            .client
            .send(ApiRequest::get("/athletes").query(filter)?)
            .await?;
        debug!("Athletes fetched: {} of {}", result.data.len(), result.total);
        Ok(result)
    }

    async fn get(&self, id: Uuid) -> Result<Athlete, AppError> {
        debug!("Fetching athlete {}", id);
        self.client.send(ApiRequest::get(format!("/athletes/{id}"))).await
    }

    async fn create(&self, payload: &AthletePayload) -> Result<Athlete, AppError> {
        payload.validate()?;
        let athlete: Athlete = self
            .client
            .send(ApiRequest::post("/athletes").json(payload)?)
            .await?;
        info!("Athlete created: {}", athlete.id);
        Ok(athlete)
    }

    async fn update(&self, id: Uuid, payload: &AthletePayload) -> Result<Athlete, AppError> {
        payload.validate()?;
        let athlete: Athlete = self
            .client
            .send(ApiRequest::put(format!("/athletes/{id}")).json(payload)?)
            .await?;
        info!("Athlete updated: {}", id);
        Ok(athlete)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!("/athletes/{id}")))
            .await?;
        info!("Athlete deleted: {}", id);
        Ok(())
    }

    async fn statistics(&self, id: Uuid) -> Result<AthleteStatistics, AppError> {
        debug!("Fetching statistics for athlete {}", id);
        self.client
            .send(ApiRequest::get(format!("/athletes/{id}/statistics")))
            .await
    }
}

/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/
use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    application::models::common::Paginated,
    application::models::matches::{
        file_name_from_disposition, ActionPayload, ExportFile, ExportFormat, Match, MatchAction,
        MatchFilter, MatchPayload, MatchSet, SetPayload,
    },
    application::models::statistics::MatchStatistics,
    application::validation::Validate,
    error::AppError,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

/// Matches, their sets and the actions scouted during play
#[async_trait]
pub trait MatchService: Send + Sync {
    async fn list(&self, filter: &MatchFilter) -> Result<Paginated<Match>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Match, AppError>;

    async fn create(&self, payload: &MatchPayload) -> Result<Match, AppError>;

    async fn update(&self, id: Uuid, payload: &MatchPayload) -> Result<Match, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    async fn add_set(&self, match_id: Uuid, payload: &SetPayload) -> Result<MatchSet, AppError>;

    async fn update_set(
        &self,
        match_id: Uuid,
        set_id: Uuid,
        payload: &SetPayload,
    ) -> Result<MatchSet, AppError>;

    async fn actions(&self, match_id: Uuid) -> Result<Vec<MatchAction>, AppError>;

    async fn record_action(
        &self,
        match_id: Uuid,
        payload: &ActionPayload,
    ) -> Result<MatchAction, AppError>;

    async fn delete_action(&self, match_id: Uuid, action_id: Uuid) -> Result<(), AppError>;

    async fn statistics(&self, match_id: Uuid) -> Result<MatchStatistics, AppError>;

    /// Downloads the match report rendered by the backend.
    ///
    /// The file name comes from `Content-Disposition` when the backend sends
    /// one, otherwise `match-<id>.<ext>`.
    async fn export(&self, match_id: Uuid, format: ExportFormat) -> Result<ExportFile, AppError>;
}

pub struct MatchServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> MatchServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> MatchService for MatchServiceImpl<T> {
    async fn list(&self, filter: &MatchFilter) -> Result<Paginated<Match>, AppError> {
        info!("Listing matches");
        let result: Paginated<Match> = self
            .client
            .send(ApiRequest::get("/matches").query(filter)?)
            .await?;
        debug!("Matches fetched: {} of {}", result.data.len(), result.total);
        Ok(result)
    }

    async fn get(&self, id: Uuid) -> Result<Match, AppError> {
        self.client.send(ApiRequest::get(format!("/matches/{id}"))).await
    }

    async fn create(&self, payload: &MatchPayload) -> Result<Match, AppError> {
        payload.validate()?;
        let created: Match = self
            .client
            .send(ApiRequest::post("/matches").json(payload)?)
            .await?;
        info!("Match created: {} vs {}", created.id, created.opponent);
        Ok(created)
    }

    async fn update(&self, id: Uuid, payload: &MatchPayload) -> Result<Match, AppError> {
        payload.validate()?;
        self.client
            .send(ApiRequest::put(format!("/matches/{id}")).json(payload)?)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!("/matches/{id}")))
            .await?;
        info!("Match deleted: {}", id);
        Ok(())
    }

    async fn add_set(&self, match_id: Uuid, payload: &SetPayload) -> Result<MatchSet, AppError> {
        payload.validate()?;
        let set: MatchSet = self
            .client
            .send(ApiRequest::post(format!("/matches/{match_id}/sets")).json(payload)?)
            .await?;
        debug!(
            "Set {} recorded for match {}: {}-{}",
            set.number, match_id, set.home_score, set.away_score
        );
        Ok(set)
    }

    async fn update_set(
        &self,
        match_id: Uuid,
        set_id: Uuid,
        payload: &SetPayload,
    ) -> Result<MatchSet, AppError> {
        payload.validate()?;
        self.client
            .send(ApiRequest::put(format!("/matches/{match_id}/sets/{set_id}")).json(payload)?)
            .await
    }

    async fn actions(&self, match_id: Uuid) -> Result<Vec<MatchAction>, AppError> {
        self.client
            .send(ApiRequest::get(format!("/matches/{match_id}/actions")))
            .await
    }

    async fn record_action(
        &self,
        match_id: Uuid,
        payload: &ActionPayload,
    ) -> Result<MatchAction, AppError> {
        self.client
            .send(ApiRequest::post(format!("/matches/{match_id}/actions")).json(payload)?)
            .await
    }

    async fn delete_action(&self, match_id: Uuid, action_id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!(
                "/matches/{match_id}/actions/{action_id}"
            )))
            .await?;
        Ok(())
    }

    async fn statistics(&self, match_id: Uuid) -> Result<MatchStatistics, AppError> {
        self.client
            .send(ApiRequest::get(format!("/matches/{match_id}/statistics")))
            .await
    }

    #[instrument(skip(self))]
    async fn export(&self, match_id: Uuid, format: ExportFormat) -> Result<ExportFile, AppError> {
        let request = ApiRequest::get(format!("/matches/{match_id}/export"))
            .query_param("format", format);
        let response = self.client.download(request).await?;

        let file_name = response
            .content_disposition
            .as_deref()
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| format!("match-{match_id}.{format}"));
        let content_type = response
            .content_type
            .unwrap_or_else(|| format.content_type().to_string());
        info!("Exported {} ({} bytes)", file_name, response.bytes.len());

        Ok(ExportFile {
            file_name,
            content_type,
            bytes: response.bytes,
        })
    }
}

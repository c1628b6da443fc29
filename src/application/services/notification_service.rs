use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    application::models::common::Paginated,
    application::models::notification::{Notification, NotificationFilter, UnreadCount},
    error::AppError,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn list(&self, filter: &NotificationFilter) -> Result<Paginated<Notification>, AppError>;

    async fn unread_count(&self) -> Result<u32, AppError>;

    async fn mark_read(&self, id: Uuid) -> Result<(), AppError>;

    async fn mark_all_read(&self) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub struct NotificationServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> NotificationServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> NotificationService for NotificationServiceImpl<T> {
    async fn list(&self, filter: &NotificationFilter) -> Result<Paginated<Notification>, AppError> {
        let result: Paginated<Notification> = self
            .client
            .send(ApiRequest::get("/notifications").query(filter)?)
            .await?;
        debug!("Notifications fetched: {}", result.data.len());
        Ok(result)
    }

    async fn unread_count(&self) -> Result<u32, AppError> {
        let result: UnreadCount = self
            .client
            .send(ApiRequest::get("/notifications/unread-count"))
            .await?;
        Ok(result.count)
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::patch(format!("/notifications/{id}/read")))
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::patch("/notifications/read-all"))
            .await?;
        debug!("All notifications marked as read");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!("/notifications/{id}")))
            .await?;
        Ok(())
    }
}

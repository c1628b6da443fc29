use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    application::models::common::Paginated,
    application::models::user::{CreateUserPayload, UpdateUserPayload, User, UserFilter},
    application::validation::{validate_required, Validate},
    error::AppError,
    transport::http_client::HttpClient,
    transport::request::ApiRequest,
};

/// Admin management of user accounts
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self, filter: &UserFilter) -> Result<Paginated<User>, AppError>;

    async fn get(&self, id: Uuid) -> Result<User, AppError>;

    async fn create(&self, payload: &CreateUserPayload) -> Result<User, AppError>;

    async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<User, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub struct UserServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> UserServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> UserService for UserServiceImpl<T> {
    async fn list(&self, filter: &UserFilter) -> Result<Paginated<User>, AppError> {
        info!("Listing users");
        let result: Paginated<User> = self
            .client
            .send(ApiRequest::get("/users").query(filter)?)
            .await?;
        debug!("Users fetched: {} of {}", result.data.len(), result.total);
        Ok(result)
    }

    async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.client.send(ApiRequest::get(format!("/users/{id}"))).await
    }

    async fn create(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        payload.validate()?;
        let user: User = self
            .client
            .send(ApiRequest::post("/users").json(payload)?)
            .await?;
        info!("User created: {} ({})", user.email, user.role);
        Ok(user)
    }

    async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<User, AppError> {
        if let Some(first_name) = &payload.first_name {
            validate_required("firstName", first_name)?;
        }
        if let Some(last_name) = &payload.last_name {
            validate_required("lastName", last_name)?;
        }
        self.client
            .send(ApiRequest::put(format!("/users/{id}")).json(payload)?)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let _: IgnoredAny = self
            .client
            .send(ApiRequest::delete(format!("/users/{id}")))
            .await?;
        info!("User deleted: {}", id);
        Ok(())
    }
}

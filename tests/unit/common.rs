use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};

use volley_client::session::interface::TokenRefresher;
use volley_client::session::token_store::TokenStore;
use volley_client::storage::{MemoryStorage, SessionStorage};
use volley_client::transport::{ApiRequest, AuthenticatedClient, BroadcastNavigator, HttpClient};
use volley_client::AppError;

/// Unsigned JWT carrying the given claims. Only the payload matters here.
pub fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(json!({"alg": "none", "typ": "JWT"}).to_string());
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}

/// Refresher that counts calls and answers after a delay, long enough for
/// concurrent 401s to queue behind it.
pub struct SlowRefresher {
    pub calls: AtomicUsize,
    delay: Duration,
    outcome: Result<String, AppError>,
}

impl SlowRefresher {
    pub fn new(delay: Duration, outcome: Result<String, AppError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            outcome,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl TokenRefresher for SlowRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.outcome.clone()
    }
}

/// Memory storage whose writes take `delay` to return after they land,
/// like a slow disk.
pub struct SlowWriteStorage {
    inner: Arc<MemoryStorage>,
    delay: Duration,
}

impl SlowWriteStorage {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl SessionStorage for SlowWriteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.inner.set(key, value).await?;
        self.pause().await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.inner.remove(key).await?;
        self.pause().await;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError> {
        self.inner.remove_many(keys).await?;
        self.pause().await;
        Ok(())
    }
}

pub struct Harness {
    pub client: AuthenticatedClient,
    /// What the client has written, without the write delay.
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<BroadcastNavigator>,
}

pub async fn harness(
    base_url: &str,
    access: Option<&str>,
    refresh: Option<&str>,
    refresher: Arc<dyn TokenRefresher>,
) -> Harness {
    harness_with_write_delay(base_url, access, refresh, refresher, Duration::ZERO).await
}

pub async fn harness_with_write_delay(
    base_url: &str,
    access: Option<&str>,
    refresh: Option<&str>,
    refresher: Arc<dyn TokenRefresher>,
    write_delay: Duration,
) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(access) = access {
        storage.set("access_token", access).await.unwrap();
    }
    if let Some(refresh) = refresh {
        storage.set("refresh_token", refresh).await.unwrap();
    }
    let slow = Arc::new(SlowWriteStorage {
        inner: storage.clone(),
        delay: write_delay,
    });
    let navigator = Arc::new(BroadcastNavigator::default());
    let client = AuthenticatedClient::with_refresher(
        Client::new(),
        base_url,
        TokenStore::new(slow),
        refresher,
        navigator.clone(),
    );
    Harness {
        client,
        storage,
        navigator,
    }
}

pub async fn get_json(client: &AuthenticatedClient, path: &str) -> Result<Value, AppError> {
    client.send(ApiRequest::get(path)).await
}

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::assert_ok;

use volley_client::session::token_store::TokenStore;
use volley_client::storage::{MemoryStorage, SessionStorage};
use volley_client::transport::{ApiRequest, AuthenticatedClient, BroadcastNavigator, HttpClient};
use volley_client::utils::logger::setup_logger;
use volley_client::{AppError, Config};

use crate::common::{get_json, harness, harness_with_write_delay, jwt, SlowRefresher};

const REFRESH_DELAY: Duration = Duration::from_millis(300);
const SLOW_WRITE: Duration = Duration::from_millis(300);
const FAST_REFRESH: Duration = Duration::from_millis(100);
const LATE_ARRIVAL: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    setup_logger();
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", Matcher::Regex(r"^/(athletes|teams)$".to_string()))
        .match_header("authorization", "Bearer t1")
        .with_status(401)
        .expect(2)
        .create_async()
        .await;
    let athletes = server
        .mock("GET", "/athletes")
        .match_header("authorization", "Bearer t2")
        .with_status(200)
        .with_body(json!({"source": "athletes"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let teams = server
        .mock("GET", "/teams")
        .match_header("authorization", "Bearer t2")
        .with_status(200)
        .with_body(json!({"source": "teams"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(REFRESH_DELAY, Ok("t2".to_string())));
    let h = harness(&server.url(), Some("t1"), Some("r1"), refresher.clone()).await;

    let (a, b) = tokio::join!(
        get_json(&h.client, "/athletes"),
        get_json(&h.client, "/teams"),
    );

    assert_eq!(a.unwrap(), json!({"source": "athletes"}));
    assert_eq!(b.unwrap(), json!({"source": "teams"}));
    assert_eq!(refresher.calls(), 1);
    assert!(!h.client.is_refreshing());
    assert_eq!(h.storage.get("access_token").await.unwrap(), Some("t2".to_string()));
    assert_eq!(h.storage.get("refresh_token").await.unwrap(), Some("r1".to_string()));
    assert_eq!(h.navigator.redirect_count(), 0);
    rejected.assert_async().await;
    athletes.assert_async().await;
    teams.assert_async().await;
}

#[tokio::test]
async fn test_failed_refresh_expires_every_waiting_request() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", Matcher::Any)
        .with_status(401)
        .expect(3)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(
        REFRESH_DELAY,
        Err(AppError::Unauthorized),
    ));
    let h = harness(&server.url(), Some("t1"), Some("r1"), refresher.clone()).await;
    h.storage.set("user", r#"{"email":"coach@club.test"}"#).await.unwrap();

    let (a, b, c) = tokio::join!(
        get_json(&h.client, "/athletes"),
        get_json(&h.client, "/teams"),
        get_json(&h.client, "/matches"),
    );

    for result in [a, b, c] {
        assert_eq!(result.unwrap_err(), AppError::SessionExpired);
    }
    assert_eq!(refresher.calls(), 1);
    assert!(h.storage.is_empty().await);
    assert_eq!(h.navigator.redirect_count(), 1);
    assert!(!h.client.is_refreshing());
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_refresh_through_backend_endpoint() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/matches")
        .match_header("authorization", "Bearer t1")
        .with_status(401)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_body(Matcher::Json(json!({"refreshToken": "r1"})))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"accessToken": "t2"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let replay = server
        .mock("GET", "/matches")
        .match_header("authorization", "Bearer t2")
        .with_status(200)
        .with_body(json!({"data": [], "total": 0, "page": 1, "limit": 20}).to_string())
        .create_async()
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set("access_token", "t1").await.unwrap();
    storage.set("refresh_token", "r1").await.unwrap();
    let navigator = Arc::new(BroadcastNavigator::default());
    let client = AuthenticatedClient::new(
        &Config::with_base_url(&server.url()),
        TokenStore::new(storage.clone()),
        navigator.clone(),
    )
    .unwrap();

    let body: Value = client.send(ApiRequest::get("/matches")).await.unwrap();

    assert_eq!(body["total"], json!(0));
    assert_eq!(storage.get("access_token").await.unwrap(), Some("t2".to_string()));
    assert_eq!(storage.get("refresh_token").await.unwrap(), Some("r1".to_string()));
    assert_eq!(navigator.redirect_count(), 0);
    first.assert_async().await;
    refresh.assert_async().await;
    replay.assert_async().await;
}

#[tokio::test]
async fn test_missing_refresh_token_redirects_without_refreshing() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", "/athletes")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(Duration::ZERO, Ok("t2".to_string())));
    let h = harness(&server.url(), Some("t1"), None, refresher.clone()).await;

    let result = get_json(&h.client, "/athletes").await;

    assert_eq!(result.unwrap_err(), AppError::Unauthorized);
    assert_eq!(refresher.calls(), 0);
    assert!(h.storage.is_empty().await);
    assert_eq!(h.navigator.redirect_count(), 1);
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_unexpired_token_rejection_keeps_session() {
    let mut server = Server::new_async().await;
    let fresh = jwt(json!({"sub": "42", "exp": 4_102_444_800_i64}));
    let rejected = server
        .mock("GET", "/users")
        .match_header("authorization", format!("Bearer {fresh}").as_str())
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(Duration::ZERO, Ok("t2".to_string())));
    let h = harness(&server.url(), Some(fresh.as_str()), Some("r1"), refresher.clone()).await;

    let result = get_json(&h.client, "/users").await;

    assert_eq!(result.unwrap_err(), AppError::Unauthorized);
    assert_eq!(refresher.calls(), 0);
    assert_eq!(h.storage.get("access_token").await.unwrap(), Some(fresh));
    assert_eq!(h.storage.get("refresh_token").await.unwrap(), Some("r1".to_string()));
    assert_eq!(h.navigator.redirect_count(), 0);
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_replayed_request_is_never_refreshed_twice() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", "/notifications")
        .with_status(401)
        .expect(2)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(Duration::ZERO, Ok("t2".to_string())));
    let h = harness(&server.url(), Some("t1"), Some("r1"), refresher.clone()).await;

    let result = get_json(&h.client, "/notifications").await;

    assert_eq!(result.unwrap_err(), AppError::Unauthorized);
    assert_eq!(refresher.calls(), 1);
    assert_eq!(h.storage.get("access_token").await.unwrap(), Some("t2".to_string()));
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_non_401_errors_bypass_recovery() {
    let mut server = Server::new_async().await;
    let forbidden = server
        .mock("DELETE", "/teams/1")
        .with_status(403)
        .with_body(json!({"message": "Only admins can delete teams", "code": "FORBIDDEN"}).to_string())
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(Duration::ZERO, Ok("t2".to_string())));
    let h = harness(&server.url(), Some("t1"), Some("r1"), refresher.clone()).await;

    let result: Result<Value, AppError> = h.client.send(ApiRequest::delete("/teams/1")).await;
    let err = result.unwrap_err();

    let api = err.to_api_error();
    assert_eq!(api.status, Some(403));
    assert_eq!(api.code, "FORBIDDEN");
    assert_eq!(api.message, "Only admins can delete teams");
    assert_eq!(refresher.calls(), 0);
    forbidden.assert_async().await;
}

#[tokio::test]
async fn test_many_queued_requests_replay_with_the_same_token() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", Matcher::Any)
        .match_header("authorization", "Bearer t1")
        .with_status(401)
        .expect(5)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", Matcher::Any)
        .match_header("authorization", "Bearer t2")
        .with_status(200)
        .with_body("[]")
        .expect(5)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(REFRESH_DELAY, Ok("t2".to_string())));
    let h = harness(&server.url(), Some("t1"), Some("r1"), refresher.clone()).await;

    let paths: Vec<String> = (1..=5).map(|n| format!("/matches/{n}/actions")).collect();
    let results = join_all(paths.iter().map(|path| get_json(&h.client, path))).await;

    for result in results {
        assert_eq!(assert_ok!(result), json!([]));
    }
    assert_eq!(refresher.calls(), 1);
    rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_401_while_refreshed_token_is_being_written_replays() {
    let mut server = Server::new_async().await;
    let refreshed = jwt(json!({"sub": "42", "exp": 4_102_444_800_i64}));
    let bearer = format!("Bearer {refreshed}");
    let roster_rejected = server
        .mock("GET", "/roster")
        .match_header("authorization", "Bearer t1")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let schedule_rejected = server
        .mock("GET", "/schedule")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", Matcher::Regex(r"^/(roster|schedule)$".to_string()))
        .match_header("authorization", bearer.as_str())
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(FAST_REFRESH, Ok(refreshed.clone())));
    let h = harness_with_write_delay(
        &server.url(),
        Some("t1"),
        Some("r1"),
        refresher.clone(),
        SLOW_WRITE,
    )
    .await;

    // The second call carries its own stale credential and gets its 401 after
    // the new token is stored but before the leader has finished writing it.
    let (first, second) = tokio::join!(get_json(&h.client, "/roster"), async {
        tokio::time::sleep(LATE_ARRIVAL).await;
        let request = ApiRequest::get("/schedule")
            .header("Authorization", "Bearer stale")
            .unwrap();
        let result: Result<Value, AppError> = h.client.send(request).await;
        result
    });

    assert_eq!(first.unwrap(), json!({}));
    assert_eq!(second.unwrap(), json!({}));
    assert_eq!(refresher.calls(), 1);
    assert_eq!(h.navigator.redirect_count(), 0);
    assert_eq!(h.storage.get("access_token").await.unwrap(), Some(refreshed));
    roster_rejected.assert_async().await;
    schedule_rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_401_while_session_is_being_cleared_gets_the_same_expiry() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", Matcher::Any)
        .with_status(401)
        .expect(2)
        .create_async()
        .await;

    let refresher = Arc::new(SlowRefresher::new(FAST_REFRESH, Err(AppError::Unauthorized)));
    let h = harness_with_write_delay(
        &server.url(),
        Some("t1"),
        Some("r1"),
        refresher.clone(),
        SLOW_WRITE,
    )
    .await;

    let (first, second) = tokio::join!(get_json(&h.client, "/roster"), async {
        tokio::time::sleep(LATE_ARRIVAL).await;
        get_json(&h.client, "/schedule").await
    });

    assert_eq!(first.unwrap_err(), AppError::SessionExpired);
    assert_eq!(second.unwrap_err(), AppError::SessionExpired);
    assert_eq!(refresher.calls(), 1);
    assert_eq!(h.navigator.redirect_count(), 1);
    assert!(h.storage.is_empty().await);
    rejected.assert_async().await;
}

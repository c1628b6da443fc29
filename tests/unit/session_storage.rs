use std::sync::Arc;

use pretty_assertions::assert_eq;

use volley_client::session::token_store::TokenStore;
use volley_client::session::{Session, UserProfile, UserRole};
use volley_client::storage::{FileStorage, SessionStorage};

fn profile() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "id": "7b1c8a4e-6a53-4c1b-9f6f-1d2e3c4b5a69",
        "email": "coach@club.test",
        "firstName": "Ana",
        "lastName": "Lopez",
        "role": "coach"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_session_survives_restart_and_clears_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let tokens = TokenStore::new(Arc::new(FileStorage::open(&path).await.unwrap()));
    tokens
        .save_session(&Session::new("t1".to_string(), "r1".to_string(), profile()))
        .await
        .unwrap();

    let reopened = TokenStore::new(Arc::new(FileStorage::open(&path).await.unwrap()));
    let session = reopened.session().await.unwrap().unwrap();
    assert_eq!(session.access_token, "t1");
    assert_eq!(session.user.role, UserRole::Coach);

    reopened.clear().await.unwrap();
    let storage = FileStorage::open(&path).await.unwrap();
    for key in ["access_token", "refresh_token", "user"] {
        assert_eq!(storage.get(key).await.unwrap(), None);
    }
}

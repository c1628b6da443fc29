use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use volley_client::session::jwt::{decode_claims, expires_at, is_token_expired, is_token_expired_at};

use crate::common::jwt;

#[test]
fn test_far_future_token_is_valid() {
    let token = jwt(json!({"sub": "42", "exp": 4_102_444_800_i64}));
    assert!(!is_token_expired(&token));
    assert_eq!(
        expires_at(&token),
        Utc.timestamp_opt(4_102_444_800, 0).single()
    );
}

#[test]
fn test_past_token_is_expired() {
    let token = jwt(json!({"sub": "42", "exp": 1_600_000_000_i64}));
    assert!(is_token_expired(&token));
}

#[test]
fn test_expiry_is_checked_against_given_clock() {
    let token = jwt(json!({"exp": 1_700_000_000_i64}));
    let before = Utc.timestamp_opt(1_699_999_999, 0).single().unwrap();
    let after = Utc.timestamp_opt(1_700_000_001, 0).single().unwrap();

    assert!(!is_token_expired_at(&token, before));
    assert!(is_token_expired_at(&token, after));
}

#[test]
fn test_undecodable_tokens_count_as_expired() {
    for token in ["", "opaque-token", "a.b.c", "a.!!!.c"] {
        assert!(is_token_expired(token), "{token:?} should be expired");
    }
    assert!(decode_claims("opaque-token").is_err());
}

#[test]
fn test_token_without_exp_counts_as_expired() {
    let token = jwt(json!({"sub": "42", "role": "coach"}));
    let claims = decode_claims(&token).unwrap();

    assert_eq!(claims.role.as_deref(), Some("coach"));
    assert!(is_token_expired(&token));
}

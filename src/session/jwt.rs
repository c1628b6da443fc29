//! Local inspection of access tokens.
//!
//! Tokens are never verified here (the backend owns the signing key); the
//! payload is only decoded to read the `exp` claim.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Decodes the payload segment of a JWT without checking its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AppError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(header), Some(payload)) if !header.is_empty() && !payload.is_empty() => payload,
        _ => {
            return Err(AppError::Deserialization(
                "token is not a JWT".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::Deserialization(format!("invalid token payload: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Expiry instant of the token, if it can be decoded and carries `exp`.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_claims(token).ok()?.exp?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Whether the token is expired at `now`.
///
/// Anything that cannot be decoded, or has no `exp` claim, counts as expired.
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match expires_at(token) {
        Some(expiry) => expiry <= now,
        None => {
            debug!("Token has no readable expiry, treating it as expired");
            true
        }
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &TokenClaims) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
    format!("{header}.{payload}.signature")
}

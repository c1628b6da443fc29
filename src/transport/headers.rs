/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::{ApiError, AppError};

/// Headers every call carries, regardless of authentication.
pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// `Authorization: Bearer <token>` value.
///
/// Tokens with characters that are not valid in a header are a request setup
/// failure, never a network one.
pub(crate) fn bearer(token: &str) -> Result<HeaderValue, AppError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
        AppError::RequestSetup(ApiError::request_setup(format!(
            "invalid bearer token: {e}"
        )))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

pub(crate) fn has_authorization(headers: &HeaderMap) -> bool {
    headers.contains_key(header::AUTHORIZATION)
}

/// Adds the bearer token unless the caller already set `Authorization`.
pub(crate) fn attach_bearer(headers: &mut HeaderMap, token: Option<&str>) -> Result<(), AppError> {
    match token {
        Some(token) if !has_authorization(headers) => {
            headers.insert(header::AUTHORIZATION, bearer(token)?);
        }
        Some(_) => debug!("Authorization header set by caller, keeping it"),
        None => debug!("No access token available, sending request unauthenticated"),
    }
    Ok(())
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), AppError> {
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        AppError::RequestSetup(ApiError::request_setup(format!(
            "invalid header name {name}: {e}"
        )))
    })?;
    let value = HeaderValue::from_str(value).map_err(|e| {
        AppError::RequestSetup(ApiError::request_setup(format!(
            "invalid value for header {name}: {e}"
        )))
    })?;
    Ok((name, value))
}

pub(crate) fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}

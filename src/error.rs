/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DESERIALIZATION_ERROR_CODE, NETWORK_ERROR_CODE, REQUEST_SETUP_ERROR_CODE,
    SESSION_EXPIRED_CODE, STORAGE_ERROR_CODE, UNAUTHORIZED_CODE, VALIDATION_ERROR_CODE,
};

/// Uniform error shape handed to callers for any failed API interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub code: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: Option<u16>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: code.into(),
            details: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, None, NETWORK_ERROR_CODE)
    }

    pub fn request_setup(message: impl Into<String>) -> Self {
        Self::new(message, None, REQUEST_SETUP_ERROR_CODE)
    }

    /// Builds the error from a non-2xx response.
    ///
    /// The backend answers with `{"message", "code", "details"}` (some routes use
    /// `error` instead of `message`). Bodies that are not JSON are used verbatim
    /// as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let fallback_code = format!("HTTP_{status}");
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let Some(Value::Object(map)) = parsed else {
            let message = if body.trim().is_empty() {
                format!("Request failed with status {status}")
            } else {
                body.trim().to_string()
            };
            return Self::new(message, Some(status), fallback_code);
        };

        let message = map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        let code = map
            .get("code")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or(fallback_code);
        let details = map.get("details").cloned().filter(|d| !d.is_null());

        Self {
            message,
            status: Some(status),
            code,
            details,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}, status {})", self.message, self.code, status),
            None => write!(f, "{} ({})", self.message, self.code),
        }
    }
}

/// A client-side form check that failed before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Validation(ValidationError),
    Unauthorized,
    SessionExpired,
    Network(ApiError),
    RequestSetup(ApiError),
    Server(ApiError),
    Deserialization(String),
    Storage(String),
}

impl AppError {
    /// Projects any variant onto the uniform error shape.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            AppError::Validation(e) => {
                let mut api = ApiError::new(e.message.clone(), None, VALIDATION_ERROR_CODE);
                api.details = Some(serde_json::json!({ "field": e.field }));
                api
            }
            AppError::Unauthorized => ApiError::new("Unauthorized", Some(401), UNAUTHORIZED_CODE),
            AppError::SessionExpired => {
                ApiError::new("Session expired", Some(401), SESSION_EXPIRED_CODE)
            }
            AppError::Network(e) | AppError::RequestSetup(e) | AppError::Server(e) => e.clone(),
            AppError::Deserialization(msg) => {
                ApiError::new(msg.clone(), None, DESERIALIZATION_ERROR_CODE)
            }
            AppError::Storage(msg) => ApiError::new(msg.clone(), None, STORAGE_ERROR_CODE),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.to_api_error().status
    }

    /// True for the two failures that force the user back to the login screen.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::SessionExpired)
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "validation error: {e}"),
            AppError::Unauthorized => write!(f, "unauthorized"),
            AppError::SessionExpired => write!(f, "session expired"),
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::RequestSetup(e) => write!(f, "request setup error: {e}"),
            AppError::Server(e) => write!(f, "server error: {e}"),
            AppError::Deserialization(s) => write!(f, "deserialization error: {s}"),
            AppError::Storage(s) => write!(f, "storage error: {s}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            AppError::RequestSetup(ApiError::request_setup(e.to_string()))
        } else if e.is_decode() {
            AppError::Deserialization(e.to_string())
        } else {
            AppError::Network(ApiError::network(e.to_string()))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Deserialization(e.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

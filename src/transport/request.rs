use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, AppError};
use crate::transport::headers::{bearer, parse_header};

/// Everything needed to dispatch (and later replay) one API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Skips 401 recovery. Used by endpoints that run without a session.
    pub public: bool,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            public: false,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        let value = serde_json::to_value(body).map_err(|e| {
            AppError::RequestSetup(ApiError::request_setup(format!(
                "failed to serialize request body: {e}"
            )))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query_param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Flattens a serializable struct into query parameters.
    ///
    /// `None` fields are skipped; nested objects and arrays are rejected.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, AppError> {
        let setup_error = |msg: String| AppError::RequestSetup(ApiError::request_setup(msg));

        let value = serde_json::to_value(params)
            .map_err(|e| setup_error(format!("failed to serialize query: {e}")))?;
        let Value::Object(map) = value else {
            return Err(setup_error("query parameters must be a struct or map".to_string()));
        };

        for (key, value) in map {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(setup_error(format!(
                        "query parameter {key} must be a scalar"
                    )))
                }
            };
            self.query.push((key, rendered));
        }
        Ok(self)
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, AppError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Copy of this request marked as retried and carrying `token`.
    ///
    /// The replay always uses the refreshed token, even if the caller had set
    /// its own `Authorization` header.
    pub(crate) fn replay_with(&self, token: &str) -> Result<Self, AppError> {
        let mut replay = self.clone();
        replay.retried = true;
        replay
            .headers
            .insert(reqwest::header::AUTHORIZATION, bearer(token)?);
        Ok(replay)
    }
}

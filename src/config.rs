use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::error;

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub rest_api: RestApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    /// Transport timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Where `FileStorage` keeps the persisted session.
    pub path: PathBuf,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"rest_api\":{},\"storage\":{}}}",
            self.rest_api, self.storage
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"path\":\"{}\"}}", self.path.display())
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            rest_api: RestApiConfig {
                base_url: get_env_or_default("VOLLEY_API_BASE_URL", String::from(DEFAULT_BASE_URL)),
                timeout: get_env_or_default("VOLLEY_API_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                path: get_env_or_default(
                    "VOLLEY_SESSION_FILE",
                    PathBuf::from(DEFAULT_SESSION_FILE),
                ),
            },
        }
    }

    /// Config pointing at an explicit API, leaving the rest to the environment.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::new();
        config.rest_api.base_url = base_url.trim_end_matches('/').to_string();
        config
    }
}

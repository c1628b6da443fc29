/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

pub(crate) const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

pub(crate) const REFRESH_ENDPOINT: &str = "/auth/refresh";

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_SESSION_FILE: &str = ".volley/session.json";

pub(crate) const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";
pub(crate) const REQUEST_SETUP_ERROR_CODE: &str = "REQUEST_SETUP_ERROR";
pub(crate) const UNAUTHORIZED_CODE: &str = "UNAUTHORIZED";
pub(crate) const SESSION_EXPIRED_CODE: &str = "SESSION_EXPIRED";
pub(crate) const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";
pub(crate) const DESERIALIZATION_ERROR_CODE: &str = "DESERIALIZATION_ERROR";
pub(crate) const STORAGE_ERROR_CODE: &str = "STORAGE_ERROR";

pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;
pub(crate) const MAX_JERSEY_NUMBER: u8 = 99;

mod common;
mod jwt_expiry;
mod refresh_flow;
mod session_storage;

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;

pub use application::client::VolleyClient;
pub use config::Config;
pub use error::{ApiError, AppError, ValidationError};

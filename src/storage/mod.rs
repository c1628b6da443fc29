/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 19/10/26
 ******************************************************************************/

//! Key-value persistence for the client session.
//!
//! The session only needs three string values, so the capability is a plain
//! get/set/remove over string keys. Implementations must make `remove_many`
//! observable as a single step: a reader never sees a half-cleared session.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::AppError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Removes every key in `keys` as one group.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError>;
}

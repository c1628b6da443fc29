pub mod auth;
pub mod interface;
pub mod jwt;
#[allow(clippy::module_inception)]
pub mod session;
pub mod token_store;

pub use session::{Session, UserProfile, UserRole};
pub use token_store::TokenStore;

pub mod headers;
pub mod http_client;
pub mod navigator;
pub mod refresh;
pub mod request;

pub use http_client::{AuthenticatedClient, BinaryResponse, HttpClient};
pub use navigator::{BroadcastNavigator, LoggingNavigator, LoginNavigator, LoginRedirect};
pub use refresh::{RefreshCoordinator, RefreshTicket};
pub use request::ApiRequest;

pub mod api_client;
pub mod envelope;
pub mod http_auth_api;
pub mod refresh;

pub use api_client::{ApiClient, ApiClientConfig};
pub use http_auth_api::HttpAuthApi;
pub use refresh::RefreshCoordinator;

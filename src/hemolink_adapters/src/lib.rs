pub mod config;
pub mod http;
pub mod navigation;
pub mod persistence;
pub mod telemetry;

pub use config::{AppMode, AuthEndpoints, Settings, SettingsError};
pub use http::{ApiClient, ApiClientConfig, HttpAuthApi, RefreshCoordinator};
pub use navigation::HistoryNavigator;
pub use persistence::{FileTokenStore, HashMapTokenStore};
pub use telemetry::init_tracing;

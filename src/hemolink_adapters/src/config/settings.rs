//! Client configuration loaded from the environment (and `.env`, if present).
//!
//! Every setting has a default, so an empty environment yields a client that
//! talks to a backend on `localhost:8080`.

use std::path::PathBuf;
use std::time::Duration;

use hemolink_application::{DEFAULT_SIGN_IN_PATH, DEFAULT_UNAUTHORIZED_PATH};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use super::constants::{defaults, env};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} must be a path starting with '/': {value}")]
    InvalidPath { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl AppMode {
    pub fn is_development(self) -> bool {
        self == AppMode::Development
    }
}

/// Backend paths of the auth endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthEndpoints {
    pub sign_up: String,
    pub sign_in: String,
    pub sign_out: String,
    pub refresh_token: String,
    pub current_user: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            sign_up: defaults::endpoints::SIGN_UP.to_string(),
            sign_in: defaults::endpoints::SIGN_IN.to_string(),
            sign_out: defaults::endpoints::SIGN_OUT.to_string(),
            refresh_token: defaults::endpoints::REFRESH_TOKEN.to_string(),
            current_user: defaults::endpoints::CURRENT_USER.to_string(),
        }
    }
}

impl AuthEndpoints {
    /// Whether a 401 from `path` should trigger a token refresh and retry.
    /// Credential exchanges report bad credentials with 401 and are never
    /// retried, nor is the refresh call itself.
    pub fn retries_on_unauthorized(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        path != self.sign_in && path != self.sign_up && path != self.refresh_token
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Announced to realtime consumers; the auth client itself never connects.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    #[serde(default)]
    pub app_mode: AppMode,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_token_store_path")]
    pub token_store_path: PathBuf,

    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,

    #[serde(default = "default_unauthorized_path")]
    pub unauthorized_path: String,

    /// Overridable with `ENDPOINTS__SIGN_IN` and friends.
    #[serde(default)]
    pub endpoints: AuthEndpoints,
}

fn default_api_base_url() -> String {
    defaults::API_BASE_URL.to_string()
}

fn default_ws_url() -> String {
    defaults::WS_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    defaults::REQUEST_TIMEOUT_MS
}

fn default_token_store_path() -> PathBuf {
    PathBuf::from(defaults::TOKEN_STORE_PATH)
}

fn default_sign_in_path() -> String {
    DEFAULT_SIGN_IN_PATH.to_string()
}

fn default_unauthorized_path() -> String {
    DEFAULT_UNAUTHORIZED_PATH.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ws_url: default_ws_url(),
            app_mode: AppMode::default(),
            request_timeout_ms: default_request_timeout_ms(),
            token_store_path: default_token_store_path(),
            sign_in_path: default_sign_in_path(),
            unauthorized_path: default_unauthorized_path(),
            endpoints: AuthEndpoints::default(),
        }
    }
}

impl Settings {
    /// Load from the process environment, after reading `.env` if present.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, SettingsError> {
        Self::from_environment(config::Environment::default().source(Some(vars)))
    }

    fn from_environment(environment: config::Environment) -> Result<Self, SettingsError> {
        let settings: Settings = config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            api_base_url = %settings.api_base_url,
            app_mode = ?settings.app_mode,
            "settings loaded"
        );
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.api_base_url()?;
        Url::parse(&self.ws_url).map_err(|_| SettingsError::InvalidUrl {
            key: env::WS_URL_ENV_VAR,
            value: self.ws_url.clone(),
        })?;
        for (key, value) in [
            (env::SIGN_IN_PATH_ENV_VAR, &self.sign_in_path),
            (env::UNAUTHORIZED_PATH_ENV_VAR, &self.unauthorized_path),
        ] {
            if !value.starts_with('/') {
                return Err(SettingsError::InvalidPath {
                    key,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        Url::parse(&self.api_base_url).map_err(|_| SettingsError::InvalidUrl {
            key: env::API_BASE_URL_ENV_VAR,
            value: self.api_base_url.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

use std::sync::Arc;

use hemolink_adapters::{
    ApiClient, ApiClientConfig, FileTokenStore, HistoryNavigator, HttpAuthApi, Settings,
    SettingsError,
};
use hemolink_application::{
    AuthActionError, AuthFacade, AuthStore, GuardDecision, RouteGuard, SessionState,
};
use hemolink_core::{ApiError, Navigator, Session, TokenStore};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum AuthClientError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The assembled auth layer: one session, one token store and one HTTP
/// client shared by every view.
pub struct AuthClient<S, N> {
    settings: Settings,
    api: Arc<ApiClient<S, N>>,
    store: Arc<AuthStore<HttpAuthApi<S, N>>>,
    navigator: N,
}

impl AuthClient<FileTokenStore, HistoryNavigator> {
    /// Load settings from the environment and persist tokens to
    /// `TOKEN_STORE_PATH`.
    pub async fn from_env() -> Result<Self, AuthClientError> {
        let settings = Settings::load()?;
        let token_store = FileTokenStore::open(&settings.token_store_path).await;
        Self::new(settings, token_store, HistoryNavigator::default())
    }
}

impl<S, N> AuthClient<S, N>
where
    S: TokenStore,
    N: Navigator + Clone,
{
    pub fn new(settings: Settings, token_store: S, navigator: N) -> Result<Self, AuthClientError> {
        let session = SessionState::new();
        let api = Arc::new(ApiClient::new(
            ApiClientConfig::from_settings(&settings)?,
            token_store,
            navigator.clone(),
            session.clone(),
        )?);
        let store = Arc::new(AuthStore::new(HttpAuthApi::new(Arc::clone(&api)), session));

        tracing::info!(
            api_base_url = %settings.api_base_url,
            app_mode = ?settings.app_mode,
            "auth client ready"
        );

        Ok(Self {
            settings,
            api,
            store,
            navigator,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// HTTP client for every other backend call. Shares the session's
    /// tokens and refresh handling.
    pub fn api(&self) -> &Arc<ApiClient<S, N>> {
        &self.api
    }

    pub fn store(&self) -> &Arc<AuthStore<HttpAuthApi<S, N>>> {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// A binding for one view. Unmount it when the view goes away.
    pub fn facade(&self) -> AuthFacade<HttpAuthApi<S, N>> {
        AuthFacade::new(Arc::clone(&self.store))
    }

    /// Unrestricted guard using the configured redirect targets.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new()
            .sign_in_path(self.settings.sign_in_path.clone())
            .unauthorized_path(self.settings.unauthorized_path.clone())
    }

    pub fn session(&self) -> Session {
        self.store.session()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.state().subscribe()
    }

    /// Pick up a session persisted by an earlier run.
    pub async fn restore_session(&self) -> Result<bool, AuthActionError> {
        self.store.restore_session().await
    }

    /// Apply `guard` to the navigator's current location.
    pub fn enforce(&self, guard: &RouteGuard) -> GuardDecision {
        guard.enforce(&self.store.session(), &self.navigator)
    }
}

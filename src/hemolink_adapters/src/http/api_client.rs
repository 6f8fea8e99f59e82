//! Backend HTTP client.
//!
//! Attaches the stored access token to every request. A 401 on any request
//! other than the credential exchanges runs the refresh protocol once and
//! replays the request with the new token. Refreshes are de-duplicated
//! through [`RefreshCoordinator`].
//!
//! Token store writes that start or end a session go through
//! [`ApiClient::store_session`] and [`ApiClient::clear_session`], which bump
//! the session epoch. A refresh that finishes under a different epoch than it
//! started with is discarded.

use std::time::Duration;

use hemolink_application::{DEFAULT_SIGN_IN_PATH, SessionState};
use hemolink_core::{
    ApiError, AuthAction, Navigator, RefreshGrant, RefreshPayload, TokenKey, TokenPair,
    TokenStore,
};
use reqwest::{Client, Method, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use super::envelope::{Envelope, ErrorBody};
use super::refresh::RefreshCoordinator;
use crate::config::{AuthEndpoints, Settings, SettingsError, defaults};

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub endpoints: AuthEndpoints,
    /// Where a forced logout sends the user.
    pub sign_in_path: String,
}

impl ApiClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_millis(defaults::REQUEST_TIMEOUT_MS),
            endpoints: AuthEndpoints::default(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            base_url: settings.api_base_url()?,
            timeout: settings.request_timeout(),
            endpoints: settings.endpoints.clone(),
            sign_in_path: settings.sign_in_path.clone(),
        })
    }
}

pub struct ApiClient<S, N> {
    http_client: Client,
    config: ApiClientConfig,
    token_store: S,
    navigator: N,
    session: SessionState,
    refresh: RefreshCoordinator,
    /// Held while the token store is written.
    epoch: Mutex<u64>,
}

impl<S, N> ApiClient<S, N>
where
    S: TokenStore,
    N: Navigator,
{
    pub fn new(
        config: ApiClientConfig,
        token_store: S,
        navigator: N,
        session: SessionState,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            token_store,
            navigator,
            session,
            refresh: RefreshCoordinator::new(),
            epoch: Mutex::new(0),
        })
    }

    pub fn token_store(&self) -> &S {
        &self.token_store
    }

    pub fn endpoints(&self) -> &AuthEndpoints {
        &self.config.endpoints
    }

    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// Persist a freshly issued session, superseding any refresh in flight.
    pub async fn store_session(&self, user_id: &str, tokens: &TokenPair) {
        let mut epoch = self.epoch.lock().await;
        *epoch += 1;
        self.token_store.store_session(user_id, tokens).await;
    }

    /// Empty the token store, superseding any refresh in flight.
    pub async fn clear_session(&self) {
        let mut epoch = self.epoch.lock().await;
        *epoch += 1;
        self.token_store.clear_all().await;
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_discarding(Method::DELETE, path, None::<&()>).await
    }

    /// Issue a request against a backend-relative `path` and decode the JSON
    /// response body.
    #[tracing::instrument(name = "ApiClient::request", skip_all, fields(%method, path))]
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, path, body).await?;
        decode(response).await
    }

    /// Like [`ApiClient::request`] for endpoints whose response body is
    /// irrelevant.
    #[tracing::instrument(name = "ApiClient::send_discarding", skip_all, fields(%method, path))]
    pub async fn send_discarding<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body).await.map(|_| ())
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let sent_token = self.token_store.get(TokenKey::AccessToken).await;

        let response = self
            .send(method.clone(), url.clone(), body, sent_token.as_ref())
            .await?;
        tracing::debug!(status = response.status().as_u16(), "response");

        if response.status() != StatusCode::UNAUTHORIZED
            || !self.config.endpoints.retries_on_unauthorized(path)
        {
            return ensure_success(response).await;
        }

        let access_token = match self.rotated_since(sent_token.as_ref()).await {
            Some(token) => token,
            None => self.refresh_session(None).await?.tokens.access_token,
        };

        let retried = self.send(method, url, body, Some(&access_token)).await?;
        tracing::debug!(status = retried.status().as_u16(), "retried response");
        ensure_success(retried).await
    }

    /// The stored access token, if it changed after `sent` went out; another
    /// request already refreshed the session in the meantime.
    async fn rotated_since(&self, sent: Option<&Secret<String>>) -> Option<Secret<String>> {
        let sent = sent?;
        self.token_store
            .get(TokenKey::AccessToken)
            .await
            .filter(|current| current.expose_secret() != sent.expose_secret())
    }

    /// Run the refresh protocol, or join the one already in flight.
    ///
    /// `presented` overrides the credentials read from the token store. On
    /// success the new tokens are stored and pushed into the session; on
    /// failure the store is emptied, the session expired and the user sent
    /// to sign-in. If a session was stored or cleared meanwhile, neither
    /// happens: a success becomes [`ApiError::SessionReplaced`] and a failure
    /// is returned as is.
    #[tracing::instrument(name = "ApiClient::refresh_session", skip_all)]
    pub async fn refresh_session(
        &self,
        presented: Option<(String, Secret<String>)>,
    ) -> Result<RefreshGrant, ApiError> {
        self.refresh
            .run(move || async move {
                let started = *self.epoch.lock().await;
                let credentials = match presented {
                    Some(credentials) => Some(credentials),
                    None => self.stored_refresh_credentials().await,
                };
                let outcome = match credentials {
                    Some((user_id, refresh_token)) => {
                        self.call_refresh(&user_id, &refresh_token).await
                    }
                    None => Err(ApiError::MissingRefreshCredentials),
                };

                let epoch = self.epoch.lock().await;
                if *epoch != started {
                    tracing::info!("session changed during refresh, discarding outcome");
                    return outcome.and(Err(ApiError::SessionReplaced));
                }
                match &outcome {
                    Ok(grant) => self.on_refresh_success(grant).await,
                    Err(error) => self.on_refresh_failure(error).await,
                }
                drop(epoch);
                outcome
            })
            .await
    }

    async fn stored_refresh_credentials(&self) -> Option<(String, Secret<String>)> {
        let refresh_token = self.token_store.get(TokenKey::RefreshToken).await?;
        let user_id = self.token_store.user_id().await?;
        Some((user_id, refresh_token))
    }

    async fn call_refresh(
        &self,
        user_id: &str,
        refresh_token: &Secret<String>,
    ) -> Result<RefreshGrant, ApiError> {
        let url = self.url(&self.config.endpoints.refresh_token)?;
        let body = RefreshRequest {
            user_id,
            refresh_token: refresh_token.expose_secret(),
        };

        let response = self.send(Method::POST, url, Some(&body), None).await?;
        let response = ensure_success(response).await?;
        let Envelope { data } = decode::<Envelope<RefreshPayload>>(response).await?;

        Ok(RefreshGrant {
            user: data.user,
            tokens: data.tokens.into_pair(refresh_token),
        })
    }

    async fn on_refresh_success(&self, grant: &RefreshGrant) {
        tracing::info!("access token refreshed");
        self.token_store
            .set(TokenKey::AccessToken, grant.tokens.access_token.clone())
            .await;
        self.token_store
            .set(TokenKey::RefreshToken, grant.tokens.refresh_token.clone())
            .await;
        if let Some(user) = &grant.user {
            self.token_store
                .set(TokenKey::UserId, Secret::new(user.id.clone()))
                .await;
        }
        self.session.dispatch(AuthAction::TokensRotated(grant.clone()));
    }

    async fn on_refresh_failure(&self, error: &ApiError) {
        tracing::warn!(%error, "token refresh failed, ending session");
        self.token_store.clear_all().await;
        self.session
            .dispatch(AuthAction::SessionExpired(error.to_string()));

        let sign_in = self.config.sign_in_path.as_str();
        let current = self.navigator.current_path();
        let current = current.split(['?', '#']).next().unwrap_or_default();
        if current != sign_in {
            self.navigator.redirect(&format!("{sign_in}?expired=true"));
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        if !path.starts_with('/') {
            return Err(ApiError::InvalidPath(path.to_string()));
        }
        let base = self.config.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|_| ApiError::InvalidPath(path.to_string()))
    }

    async fn send<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        bearer: Option<&Secret<String>>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http_client.request(method, url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(classify)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    user_id: &'a str,
    refresh_token: &'a str,
}

fn classify(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Transport(error.to_string())
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`]
/// carrying the backend's message, or the status reason if it sent none.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await.map_err(classify)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

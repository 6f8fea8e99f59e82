use std::sync::Arc;

use hemolink_core::{
    ApiError, AuthApi, AuthPayload, Credentials, Navigator, RefreshGrant, SignUpData, TokenStore,
    User,
};
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::api_client::ApiClient;
use super::envelope::Envelope;

/// [`AuthApi`] over the backend's REST endpoints.
///
/// Successful credential exchanges are written to the token store before
/// they are returned; sign-out empties it whatever the backend answers.
pub struct HttpAuthApi<S, N> {
    client: Arc<ApiClient<S, N>>,
}

impl<S, N> Clone for HttpAuthApi<S, N> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<S, N> HttpAuthApi<S, N>
where
    S: TokenStore,
    N: Navigator,
{
    pub fn new(client: Arc<ApiClient<S, N>>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient<S, N>> {
        &self.client
    }

    async fn exchange<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthPayload, ApiError> {
        let Envelope { data } = self
            .client
            .post::<Envelope<AuthPayload>, _>(path, body)
            .await?;
        self.client.store_session(&data.user.id, &data.tokens).await;
        Ok(data)
    }
}

#[async_trait::async_trait]
impl<S, N> AuthApi for HttpAuthApi<S, N>
where
    S: TokenStore,
    N: Navigator,
{
    #[tracing::instrument(name = "HttpAuthApi::sign_up", skip_all)]
    async fn sign_up(&self, data: SignUpData) -> Result<AuthPayload, ApiError> {
        let body = SignUpRequest {
            email: &data.email,
            password: data.password.as_ref().expose_secret(),
            full_name: data.full_name.as_deref(),
            sex: data.sex.as_deref(),
            yob: data.yob,
            phone: data.phone.as_deref(),
            address: data.address.as_deref(),
            id_card: data.id_card.as_deref(),
        };
        self.exchange(&self.client.endpoints().sign_up, &body).await
    }

    #[tracing::instrument(name = "HttpAuthApi::sign_in", skip_all)]
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthPayload, ApiError> {
        let body = SignInRequest {
            email_or_phone: credentials.email_or_phone.as_ref().expose_secret(),
            password: credentials.password.as_ref().expose_secret(),
        };
        self.exchange(&self.client.endpoints().sign_in, &body).await
    }

    #[tracing::instrument(name = "HttpAuthApi::sign_out", skip_all)]
    async fn sign_out(&self) -> Result<(), ApiError> {
        let outcome = self
            .client
            .send_discarding(Method::POST, &self.client.endpoints().sign_out, None::<&()>)
            .await;
        self.client.clear_session().await;
        outcome
    }

    async fn refresh_token(
        &self,
        user_id: &str,
        refresh_token: &Secret<String>,
    ) -> Result<RefreshGrant, ApiError> {
        self.client
            .refresh_session(Some((user_id.to_string(), refresh_token.clone())))
            .await
    }

    #[tracing::instrument(name = "HttpAuthApi::current_user", skip_all)]
    async fn current_user(&self) -> Result<User, ApiError> {
        let profile: ProfileResponse = self
            .client
            .get(&self.client.endpoints().current_user)
            .await?;
        Ok(profile.into_user())
    }

    #[tracing::instrument(name = "HttpAuthApi::restore", skip_all)]
    async fn restore(&self) -> Result<Option<AuthPayload>, ApiError> {
        let store = self.client.token_store();
        if store.token_pair().await.is_none() || store.user_id().await.is_none() {
            tracing::debug!("no stored session");
            return Ok(None);
        }

        let user = self.current_user().await?;
        // Fetching the profile may have refreshed the tokens.
        let Some(tokens) = store.token_pair().await else {
            return Ok(None);
        };
        Ok(Some(AuthPayload { user, tokens }))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email_or_phone: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yob: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_card: Option<&'a str>,
}

/// Profile responses come as `{data: user}`, `{data: {user}}` or a bare user
/// depending on the backend version.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileResponse {
    Nested { data: NestedUser },
    Wrapped { data: User },
    Bare(User),
}

#[derive(Deserialize)]
struct NestedUser {
    user: User,
}

impl ProfileResponse {
    fn into_user(self) -> User {
        match self {
            ProfileResponse::Nested { data } => data.user,
            ProfileResponse::Wrapped { data } | ProfileResponse::Bare(data) => data,
        }
    }
}

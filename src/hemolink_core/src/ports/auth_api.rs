use async_trait::async_trait;
use secrecy::Secret;

use crate::{
    domain::{
        credentials::{Credentials, SignUpData},
        user::{AuthPayload, RefreshGrant, User},
    },
    error::ApiError,
};

/// Backend authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_up(&self, data: SignUpData) -> Result<AuthPayload, ApiError>;

    async fn sign_in(&self, credentials: Credentials) -> Result<AuthPayload, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(
        &self,
        user_id: &str,
        refresh_token: &Secret<String>,
    ) -> Result<RefreshGrant, ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;

    /// Rebuild a session from durable storage.
    ///
    /// `Ok(None)` when nothing usable is stored.
    async fn restore(&self) -> Result<Option<AuthPayload>, ApiError>;
}

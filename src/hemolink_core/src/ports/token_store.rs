use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use crate::domain::tokens::TokenPair;

/// Keys of the durable session entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
    UserId,
}

impl TokenKey {
    pub const ALL: [TokenKey; 3] = [
        TokenKey::AccessToken,
        TokenKey::RefreshToken,
        TokenKey::UserId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "accessToken",
            TokenKey::RefreshToken => "refreshToken",
            TokenKey::UserId => "userId",
        }
    }
}

/// Durable key-value storage for the session tokens.
///
/// Storage is assumed to be available. Implementations drop writes they
/// cannot persist instead of failing; the session then simply does not
/// survive a restart.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn set(&self, key: TokenKey, value: Secret<String>);
    async fn get(&self, key: TokenKey) -> Option<Secret<String>>;
    async fn clear(&self, keys: &[TokenKey]);

    async fn clear_all(&self) {
        self.clear(&TokenKey::ALL).await;
    }

    /// Persist all three entries of a freshly issued session.
    async fn store_session(&self, user_id: &str, tokens: &TokenPair) {
        self.set(TokenKey::AccessToken, tokens.access_token.clone())
            .await;
        self.set(TokenKey::RefreshToken, tokens.refresh_token.clone())
            .await;
        self.set(TokenKey::UserId, Secret::new(user_id.to_string()))
            .await;
    }

    /// The stored token pair, when both halves are present.
    async fn token_pair(&self) -> Option<TokenPair> {
        let access_token = self.get(TokenKey::AccessToken).await?;
        let refresh_token = self.get(TokenKey::RefreshToken).await?;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn user_id(&self) -> Option<String> {
        self.get(TokenKey::UserId)
            .await
            .map(|id| id.expose_secret().clone())
    }
}

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Access/refresh token pair issued by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            refresh_token: Secret::new(refresh_token.into()),
        }
    }
}

impl PartialEq for TokenPair {
    fn eq(&self, other: &Self) -> bool {
        self.access_token.expose_secret() == other.access_token.expose_secret()
            && self.refresh_token.expose_secret() == other.refresh_token.expose_secret()
    }
}

/// Tokens returned by the refresh endpoint. The backend may rotate the
/// refresh token or keep the old one, in which case it is omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
}

impl RefreshedTokens {
    /// Combine with the refresh token that was presented to obtain these tokens.
    pub fn into_pair(self, presented: &Secret<String>) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .filter(|token| !token.expose_secret().is_empty())
                .unwrap_or_else(|| presented.clone()),
        }
    }
}

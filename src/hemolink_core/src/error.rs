use thiserror::Error;

/// Backend failure normalized to `{status, message}` at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("No refresh token available")]
    MissingRefreshCredentials,
    #[error("Invalid request path: {0}")]
    InvalidPath(String),
    /// The session was signed in or out while a token refresh was running;
    /// the refresh result belongs to nobody.
    #[error("Session changed during token refresh")]
    SessionReplaced,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Transport(_))
    }
}

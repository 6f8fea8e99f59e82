use hemolink_core::{
    ApiError, AuthAction, AuthApi, Credentials, Phase, Session, SignUpData, User, UserPatch,
    ValidationErrors, messages,
};

use crate::state::SessionState;

/// Error types for auth actions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthActionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("No refresh token available")]
    NoRefreshToken,
    #[error("Not signed in")]
    NotAuthenticated,
}

impl AuthActionError {
    /// Text suitable for an error banner.
    pub fn display_message(&self) -> &'static str {
        match self {
            AuthActionError::Api(error) => messages::describe(error),
            AuthActionError::Validation(errors) => errors
                .0
                .first()
                .map(|e| e.message)
                .unwrap_or(messages::GENERIC_FAILURE),
            AuthActionError::NoRefreshToken | AuthActionError::NotAuthenticated => {
                messages::SESSION_EXPIRED
            }
        }
    }
}

/// Single source of truth for the session.
///
/// Async actions dispatch `pending` before the network call and exactly one of
/// `fulfilled`/`rejected` after it, so `loading` never stays set.
pub struct AuthStore<A> {
    api: A,
    state: SessionState,
}

impl<A> AuthStore<A>
where
    A: AuthApi,
{
    pub fn new(api: A, state: SessionState) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Session {
        self.state.snapshot()
    }

    #[tracing::instrument(name = "AuthStore::sign_up", skip_all)]
    pub async fn sign_up(&self, data: SignUpData) -> Result<User, AuthActionError> {
        self.state.dispatch(AuthAction::SignUp(Phase::Pending));

        match self.api.sign_up(data).await {
            Ok(payload) => {
                let user = payload.user.clone();
                self.state
                    .dispatch(AuthAction::SignUp(Phase::Fulfilled(payload)));
                Ok(user)
            }
            Err(error) => {
                tracing::info!(%error, "sign-up rejected");
                self.state
                    .dispatch(AuthAction::SignUp(Phase::Rejected(error.to_string())));
                Err(error.into())
            }
        }
    }

    #[tracing::instrument(name = "AuthStore::sign_in", skip_all)]
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, AuthActionError> {
        self.state.dispatch(AuthAction::SignIn(Phase::Pending));

        match self.api.sign_in(credentials).await {
            Ok(payload) => {
                let user = payload.user.clone();
                tracing::info!(user_id = %user.id, role = %user.role, "signed in");
                self.state
                    .dispatch(AuthAction::SignIn(Phase::Fulfilled(payload)));
                Ok(user)
            }
            Err(error) => {
                tracing::info!(%error, "sign-in rejected");
                self.state
                    .dispatch(AuthAction::SignIn(Phase::Rejected(error.to_string())));
                Err(error.into())
            }
        }
    }

    /// Ends the session. The local session is cleared even when the backend
    /// call fails; the error is still returned for the caller to inspect.
    #[tracing::instrument(name = "AuthStore::sign_out", skip_all)]
    pub async fn sign_out(&self) -> Result<(), AuthActionError> {
        self.state.dispatch(AuthAction::SignOut(Phase::Pending));

        match self.api.sign_out().await {
            Ok(()) => {
                self.state.dispatch(AuthAction::SignOut(Phase::Fulfilled(())));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "sign-out failed on the backend, clearing locally");
                self.state
                    .dispatch(AuthAction::SignOut(Phase::Rejected(error.to_string())));
                Err(error.into())
            }
        }
    }

    /// Exchange the session's refresh token for new tokens.
    ///
    /// Without a refresh token and user id this rejects without touching the
    /// network.
    #[tracing::instrument(name = "AuthStore::refresh_token", skip_all)]
    pub async fn refresh_token(&self) -> Result<(), AuthActionError> {
        let credentials = self.state.read(|session| {
            let refresh_token = session.tokens.as_ref()?.refresh_token.clone();
            let user_id = session.user.as_ref()?.id.clone();
            Some((user_id, refresh_token))
        });

        let Some((user_id, refresh_token)) = credentials else {
            let error = AuthActionError::NoRefreshToken;
            self.state
                .dispatch(AuthAction::RefreshToken(Phase::Rejected(error.to_string())));
            return Err(error);
        };

        self.state.dispatch(AuthAction::RefreshToken(Phase::Pending));

        match self.api.refresh_token(&user_id, &refresh_token).await {
            Ok(grant) => {
                self.state
                    .dispatch(AuthAction::RefreshToken(Phase::Fulfilled(grant)));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "token refresh failed, session cleared");
                self.state
                    .dispatch(AuthAction::RefreshToken(Phase::Rejected(error.to_string())));
                Err(error.into())
            }
        }
    }

    /// Rebuild the session from durable storage. Returns whether a session
    /// was restored.
    #[tracing::instrument(name = "AuthStore::restore_session", skip_all)]
    pub async fn restore_session(&self) -> Result<bool, AuthActionError> {
        self.state.dispatch(AuthAction::Restore(Phase::Pending));

        match self.api.restore().await {
            Ok(payload) => {
                let restored = payload.is_some();
                self.state
                    .dispatch(AuthAction::Restore(Phase::Fulfilled(payload)));
                Ok(restored)
            }
            Err(error) => {
                self.state
                    .dispatch(AuthAction::Restore(Phase::Rejected(error.to_string())));
                Err(error.into())
            }
        }
    }

    /// Fetch the current profile and replace the in-memory user.
    #[tracing::instrument(name = "AuthStore::reload_user", skip_all)]
    pub async fn reload_user(&self) -> Result<User, AuthActionError> {
        if !self.state.read(Session::is_authenticated) {
            return Err(AuthActionError::NotAuthenticated);
        }

        let user = self.api.current_user().await?;
        self.state.dispatch(AuthAction::ReplaceUser(user.clone()));
        Ok(user)
    }

    pub fn update_user(&self, patch: UserPatch) {
        self.state.dispatch(AuthAction::UpdateUser(patch));
    }

    pub fn clear_error(&self) {
        self.state.dispatch(AuthAction::ClearError);
    }

    pub fn clear_auth(&self) {
        self.state.dispatch(AuthAction::ClearAuth);
    }
}

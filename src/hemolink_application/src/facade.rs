//! Consumer-facing binding over [`AuthStore`].
//!
//! Each view holds its own facade. Once a view unmounts, results of actions it
//! started are discarded for that view (the session itself is still updated).

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use hemolink_core::{
    AuthApi, Credentials, Permission, Role, RoleQuery, Session, SignUpData, SignUpForm, User,
    UserPatch, messages,
};
use tokio::sync::watch;

use crate::auth_store::{AuthActionError, AuthStore};

pub struct AuthFacade<A> {
    store: Arc<AuthStore<A>>,
    mounted: Arc<AtomicBool>,
}

impl<A> Clone for AuthFacade<A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<A> AuthFacade<A>
where
    A: AuthApi,
{
    pub fn new(store: Arc<AuthStore<A>>) -> Self {
        Self {
            store,
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn session(&self) -> Session {
        self.store.session()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.state().subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.store.state().read(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.store.state().read(Session::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.state().read(Session::is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.store.state().read(|s| s.loading)
    }

    /// Raw error message as reported by the backend.
    pub fn error(&self) -> Option<String> {
        self.store.state().read(|s| s.error.clone())
    }

    /// Error message translated for display.
    pub fn error_message(&self) -> Option<&'static str> {
        self.store
            .state()
            .read(|s| s.error.as_deref().map(messages::translate))
    }

    pub fn has_role<Q: RoleQuery + ?Sized>(&self, roles: &Q) -> bool {
        self.store.state().read(|s| s.has_role(roles))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.store.state().read(|s| s.has_permission(permission))
    }

    /// String-keyed variant for permission names coming from route tables.
    pub fn has_permission_key(&self, key: &str) -> bool {
        self.store.state().read(|s| s.has_permission_key(key))
    }

    pub fn is_same_facility(&self, facility_id: Option<&str>) -> bool {
        self.store.state().read(|s| s.is_same_facility(facility_id))
    }

    /// Validate and submit a sign-in. Invalid input is reported per field
    /// and never reaches the backend.
    ///
    /// `None` means the view unmounted before the result arrived.
    pub async fn sign_in(
        &self,
        email_or_phone: &str,
        password: &str,
    ) -> Option<Result<User, AuthActionError>> {
        let credentials = match Credentials::parse(email_or_phone, password) {
            Ok(credentials) => credentials,
            Err(errors) => return self.deliver(Err(errors.into())),
        };
        let outcome = self.store.sign_in(credentials).await;
        self.deliver(outcome)
    }

    pub async fn sign_up(&self, form: SignUpForm) -> Option<Result<User, AuthActionError>> {
        let data = match SignUpData::parse(form) {
            Ok(data) => data,
            Err(errors) => return self.deliver(Err(errors.into())),
        };
        let outcome = self.store.sign_up(data).await;
        self.deliver(outcome)
    }

    pub async fn sign_out(&self) -> Option<Result<(), AuthActionError>> {
        let outcome = self.store.sign_out().await;
        self.deliver(outcome)
    }

    pub async fn refresh_token(&self) -> Option<Result<(), AuthActionError>> {
        let outcome = self.store.refresh_token().await;
        self.deliver(outcome)
    }

    pub fn update_user(&self, patch: UserPatch) {
        self.store.update_user(patch);
    }

    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    pub fn clear_auth(&self) {
        self.store.clear_auth();
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn deliver<T>(&self, outcome: T) -> Option<T> {
        if self.is_mounted() {
            Some(outcome)
        } else {
            tracing::debug!("view unmounted, discarding late result");
            None
        }
    }
}

//! Access gate for protected views.
//!
//! The guard keeps no state of its own: a decision is a pure function of the
//! current session and the guard's requirements.

use hemolink_core::{Navigator, Permission, Role, Session};
use tokio::sync::watch;

pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Query parameter of the sign-in location carrying the route to return to.
pub const RETURN_PARAM: &str = "redirect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// An auth action is in flight; render a loading affordance.
    Checking,
    DenyUnauthenticated {
        redirect_to: String,
        /// Location to return to after signing in.
        return_to: String,
    },
    DenyRole {
        redirect_to: String,
    },
    DenyPermission {
        redirect_to: String,
    },
    Allow,
}

impl GuardDecision {
    pub fn redirect(&self) -> Option<&str> {
        match self {
            GuardDecision::DenyUnauthenticated { redirect_to, .. }
            | GuardDecision::DenyRole { redirect_to }
            | GuardDecision::DenyPermission { redirect_to } => Some(redirect_to),
            GuardDecision::Checking | GuardDecision::Allow => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    required_roles: Vec<Role>,
    required_permissions: Vec<Permission>,
    sign_in_path: String,
    unauthorized_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            required_roles: Vec::new(),
            required_permissions: Vec::new(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles.extend(roles);
        self
    }

    pub fn require_permissions(
        mut self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.required_permissions.extend(permissions);
        self
    }

    pub fn sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    pub fn unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    /// Decide for `location`. Rules apply in order: loading, authentication,
    /// roles, then permissions (any one required permission suffices).
    ///
    /// Unauthenticated users are sent to sign-in with `location` encoded in
    /// the [`RETURN_PARAM`] query parameter.
    pub fn evaluate(&self, session: &Session, location: &str) -> GuardDecision {
        if session.loading {
            return GuardDecision::Checking;
        }

        if !session.is_authenticated() {
            return GuardDecision::DenyUnauthenticated {
                redirect_to: format!(
                    "{}?{RETURN_PARAM}={}",
                    self.sign_in_path,
                    urlencoding::encode(location)
                ),
                return_to: location.to_string(),
            };
        }

        if !self.required_roles.is_empty() && !session.has_role(self.required_roles.as_slice()) {
            return GuardDecision::DenyRole {
                redirect_to: self.unauthorized_path.clone(),
            };
        }

        if !self.required_permissions.is_empty()
            && !self
                .required_permissions
                .iter()
                .any(|permission| session.has_permission(*permission))
        {
            return GuardDecision::DenyPermission {
                redirect_to: self.unauthorized_path.clone(),
            };
        }

        GuardDecision::Allow
    }

    /// Evaluate for the navigator's current location and issue the redirect,
    /// if any.
    pub fn enforce<N>(&self, session: &Session, navigator: &N) -> GuardDecision
    where
        N: Navigator + ?Sized,
    {
        let decision = self.evaluate(session, &navigator.current_path());
        if let Some(target) = decision.redirect() {
            tracing::debug!(location = target, "route guard redirect");
            navigator.redirect(target);
        }
        decision
    }

    /// Wait until no auth action is in flight, then decide.
    ///
    /// If the session source is gone the last known session is used.
    pub async fn settle(
        &self,
        sessions: &mut watch::Receiver<Session>,
        location: &str,
    ) -> GuardDecision {
        if sessions.wait_for(|session| !session.loading).await.is_err() {
            tracing::debug!("session source closed, deciding on last known session");
        }
        let session = sessions.borrow().clone();
        self.evaluate(&session, location)
    }
}

/// The route a sign-in `location` asks to return to after login.
///
/// Only same-origin paths are honoured.
pub fn return_location(location: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    let raw = query.split('&').find_map(|pair| {
        pair.strip_prefix(RETURN_PARAM)
            .and_then(|rest| rest.strip_prefix('='))
    })?;
    let target = urlencoding::decode(raw).ok()?.into_owned();
    (target.starts_with('/') && !target.starts_with("//")).then_some(target)
}

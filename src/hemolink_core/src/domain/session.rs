//! Client session and the reducer that is its only mutator.
//!
//! `is_authenticated()` is derived from the presence of tokens, so a session
//! can never claim to be authenticated without them.

use super::{
    permission::Permission,
    role::{Role, RoleQuery},
    tokens::TokenPair,
    user::{AuthPayload, RefreshGrant, User, UserPatch},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub tokens: Option<TokenPair>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Lifecycle phase of an asynchronous action.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SignUp(Phase<AuthPayload>),
    SignIn(Phase<AuthPayload>),
    SignOut(Phase<()>),
    RefreshToken(Phase<RefreshGrant>),
    /// Session rebuilt from durable storage at boot.
    Restore(Phase<Option<AuthPayload>>),
    /// Tokens rotated by the HTTP layer outside of an explicit refresh action.
    TokensRotated(RefreshGrant),
    /// The HTTP layer could not refresh; the session is over.
    SessionExpired(String),
    UpdateUser(UserPatch),
    ReplaceUser(User),
    ClearError,
    ClearAuth,
}

impl AuthAction {
    /// Short label for logs; never includes payload data.
    pub fn name(&self) -> &'static str {
        use Phase::{Fulfilled, Pending, Rejected};

        match self {
            AuthAction::SignUp(Pending) => "signUp/pending",
            AuthAction::SignUp(Fulfilled(_)) => "signUp/fulfilled",
            AuthAction::SignUp(Rejected(_)) => "signUp/rejected",
            AuthAction::SignIn(Pending) => "signIn/pending",
            AuthAction::SignIn(Fulfilled(_)) => "signIn/fulfilled",
            AuthAction::SignIn(Rejected(_)) => "signIn/rejected",
            AuthAction::SignOut(Pending) => "signOut/pending",
            AuthAction::SignOut(Fulfilled(_)) => "signOut/fulfilled",
            AuthAction::SignOut(Rejected(_)) => "signOut/rejected",
            AuthAction::RefreshToken(Pending) => "refreshToken/pending",
            AuthAction::RefreshToken(Fulfilled(_)) => "refreshToken/fulfilled",
            AuthAction::RefreshToken(Rejected(_)) => "refreshToken/rejected",
            AuthAction::Restore(Pending) => "restore/pending",
            AuthAction::Restore(Fulfilled(_)) => "restore/fulfilled",
            AuthAction::Restore(Rejected(_)) => "restore/rejected",
            AuthAction::TokensRotated(_) => "tokensRotated",
            AuthAction::SessionExpired(_) => "sessionExpired",
            AuthAction::UpdateUser(_) => "updateUser",
            AuthAction::ReplaceUser(_) => "replaceUser",
            AuthAction::ClearError => "clearError",
            AuthAction::ClearAuth => "clearAuth",
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Apply one action. This is the only place a session changes.
    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::SignUp(phase) | AuthAction::SignIn(phase) => match phase {
                Phase::Pending => self.begin(),
                Phase::Fulfilled(payload) => self.establish(payload),
                Phase::Rejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            },
            AuthAction::SignOut(Phase::Pending) => self.loading = true,
            // Sign-out clears locally whatever the backend said.
            AuthAction::SignOut(_) | AuthAction::ClearAuth => *self = Session::default(),
            AuthAction::RefreshToken(phase) => match phase {
                Phase::Pending => self.begin(),
                Phase::Fulfilled(grant) => {
                    self.rotate(grant);
                    self.loading = false;
                }
                Phase::Rejected(message) => self.expire(message),
            },
            AuthAction::Restore(phase) => match phase {
                Phase::Pending => self.begin(),
                Phase::Fulfilled(Some(payload)) => self.establish(payload),
                Phase::Fulfilled(None) => self.loading = false,
                Phase::Rejected(message) => self.expire(message),
            },
            AuthAction::TokensRotated(grant) => {
                // A rotation never signs anyone in.
                if self.is_authenticated() {
                    self.rotate(grant);
                }
            }
            AuthAction::SessionExpired(message) => self.expire(message),
            AuthAction::UpdateUser(patch) => {
                if let Some(user) = self.user.as_mut() {
                    user.apply(patch);
                }
            }
            AuthAction::ReplaceUser(user) => {
                if self.is_authenticated() {
                    self.user = Some(user);
                }
            }
            AuthAction::ClearError => self.error = None,
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn establish(&mut self, payload: AuthPayload) {
        self.user = Some(payload.user);
        self.tokens = Some(payload.tokens);
        self.loading = false;
        self.error = None;
    }

    fn rotate(&mut self, grant: RefreshGrant) {
        if let Some(user) = grant.user {
            self.user = Some(user);
        }
        self.tokens = Some(grant.tokens);
    }

    fn expire(&mut self, message: String) {
        *self = Session {
            error: Some(message),
            ..Session::default()
        };
    }

    // Selectors

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn facility_id(&self) -> Option<&str> {
        self.user.as_ref()?.facility_id.as_deref()
    }

    pub fn position(&self) -> Option<&str> {
        self.user.as_ref()?.position.as_deref()
    }

    pub fn facility_name(&self) -> Option<&str> {
        self.user.as_ref()?.facility_name.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|role| role.is_admin())
    }

    pub fn is_manager(&self) -> bool {
        self.role().is_some_and(|role| role.is_manager())
    }

    pub fn is_doctor(&self) -> bool {
        self.role().is_some_and(|role| role.is_doctor())
    }

    pub fn is_nurse(&self) -> bool {
        self.role().is_some_and(|role| role.is_nurse())
    }

    pub fn is_transporter(&self) -> bool {
        self.role().is_some_and(|role| role.is_transporter())
    }

    pub fn is_member(&self) -> bool {
        self.role().is_some_and(|role| role.is_member())
    }

    pub fn is_staff(&self) -> bool {
        self.role().is_some_and(|role| role.is_staff())
    }

    // Access predicates

    /// False when there is no current role.
    pub fn has_role<Q: RoleQuery + ?Sized>(&self, roles: &Q) -> bool {
        self.role().is_some_and(|role| roles.matches(role))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        permission.granted_to(self.role(), self.is_authenticated())
    }

    /// Unknown keys grant nothing.
    pub fn has_permission_key(&self, key: &str) -> bool {
        key.parse::<Permission>()
            .is_ok_and(|permission| self.has_permission(permission))
    }

    pub fn is_same_facility(&self, facility_id: Option<&str>) -> bool {
        match (self.facility_id(), facility_id) {
            (Some(own), Some(other)) => own == other,
            _ => false,
        }
    }
}

pub mod auth_store;
pub mod facade;
pub mod route_guard;
pub mod state;

pub use auth_store::{AuthActionError, AuthStore};
pub use facade::AuthFacade;
pub use route_guard::{
    DEFAULT_SIGN_IN_PATH, DEFAULT_UNAUTHORIZED_PATH, GuardDecision, RETURN_PARAM, RouteGuard,
    return_location,
};
pub use state::SessionState;

pub mod domain;
pub mod error;
pub mod messages;
pub mod ports;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use domain::{
    credentials::{
        Credentials, EmailOrPhone, Field, MIN_PASSWORD_LENGTH, Password, SignUpData, SignUpForm,
        ValidationError, ValidationErrors,
    },
    permission::{Permission, UnknownPermission},
    role::{Role, RoleQuery, UnknownRole},
    session::{AuthAction, Phase, Session},
    tokens::{RefreshedTokens, TokenPair},
    user::{AuthPayload, RefreshGrant, RefreshPayload, User, UserPatch},
};

pub use error::ApiError;

pub use ports::{
    auth_api::AuthApi,
    navigator::Navigator,
    token_store::{TokenKey, TokenStore},
};

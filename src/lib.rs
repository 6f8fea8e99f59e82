//! # Hemolink - Auth client for the blood-donation front-end
//!
//! Facade crate re-exporting the session, token refresh and route-guard
//! layer from its component crates.
//!
//! ## Structure
//!
//! - **Core domain types**: `Session`, `User`, `Role`, `Permission`, `TokenPair`, etc.
//! - **Ports**: `TokenStore`, `AuthApi`, `Navigator`
//! - **Application**: `AuthStore`, `AuthFacade`, `RouteGuard`
//! - **Adapters**: `ApiClient`, `HttpAuthApi`, `FileTokenStore`, `Settings`, etc.
//! - **Client**: `AuthClient` - everything wired together
//!
//! ## Example
//!
//! ```no_run
//! use hemolink::{AuthClient, GuardDecision, Permission};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AuthClient::from_env().await?;
//! client.restore_session().await?;
//!
//! let guard = client.guard().require_permissions([Permission::ManagerAccess]);
//! if client.enforce(&guard) == GuardDecision::Allow {
//!     let inventory: serde_json::Value = client.api().get("/blood-inventory").await?;
//!     println!("{inventory}");
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use hemolink_core::*;
}

pub use hemolink_core::{
    AuthAction, AuthPayload, Credentials, Field, Permission, Phase, RefreshGrant, Role,
    RoleQuery, Session, SignUpData, SignUpForm, TokenPair, User, UserPatch, ValidationError,
    ValidationErrors, messages,
};

// ============================================================================
// Ports
// ============================================================================

/// Traits the application layer is written against
pub mod ports {
    pub use hemolink_core::{ApiError, AuthApi, Navigator, TokenKey, TokenStore};
}

pub use ports::{ApiError, AuthApi, Navigator, TokenKey, TokenStore};

// ============================================================================
// Application Layer
// ============================================================================

pub mod application {
    pub use hemolink_application::*;
}

pub use hemolink_application::{
    AuthActionError, AuthFacade, AuthStore, GuardDecision, RouteGuard, SessionState,
    return_location,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Backend HTTP client and refresh handling
    pub mod http {
        pub use hemolink_adapters::http::*;
    }

    /// Token store implementations
    pub mod persistence {
        pub use hemolink_adapters::persistence::*;
    }

    pub mod navigation {
        pub use hemolink_adapters::navigation::*;
    }

    /// Configuration
    pub mod config {
        pub use hemolink_adapters::config::*;
    }

    pub use hemolink_adapters::telemetry;
}

pub use hemolink_adapters::{
    ApiClient, AppMode, FileTokenStore, HashMapTokenStore, HistoryNavigator, HttpAuthApi,
    Settings, init_tracing,
};

// ============================================================================
// Auth Client (Main Entry Point)
// ============================================================================

pub use hemolink_auth_client::{AuthClient, AuthClientError};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with tokens
pub use secrecy::{ExposeSecret, Secret};

pub use reqwest;

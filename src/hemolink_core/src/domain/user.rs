use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    role::Role,
    tokens::{RefreshedTokens, TokenPair},
};

/// Profile of the signed-in account.
///
/// Fields the client does not interpret are kept in `extra` so that a
/// round trip through the session does not lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: None,
            role,
            facility_id: None,
            position: None,
            facility_name: None,
            extra: Map::new(),
        }
    }

    pub fn with_facility(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = Some(facility_id.into());
        self
    }

    /// Merge a partial update. Only fields present in `patch` change.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = Some(full_name);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(facility_id) = patch.facility_id {
            self.facility_id = Some(facility_id);
        }
        if let Some(position) = patch.position {
            self.position = Some(position);
        }
        if let Some(facility_name) = patch.facility_name {
            self.facility_name = Some(facility_name);
        }
        self.extra.extend(patch.extra);
    }
}

/// Partial user update for the `updateUser` merge action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` of a successful sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: TokenPair,
}

/// `data` of a successful refresh. The user is optional on this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshPayload {
    #[serde(default)]
    pub user: Option<User>,
    pub tokens: RefreshedTokens,
}

/// Outcome of a completed refresh, with the token pair already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshGrant {
    pub user: Option<User>,
    pub tokens: TokenPair,
}

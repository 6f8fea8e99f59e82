//! Roles assigned to platform accounts.
//!
//! Every authenticated user carries exactly one role. Role-derived flags
//! (`is_admin`, `is_staff`, ...) live here so there is a single canonical
//! place that decides what a role means.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Manager of a single facility.
    Manager,
    Doctor,
    Nurse,
    /// Staff moving blood units between facilities.
    Transporter,
    /// Registered donor.
    Member,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Doctor,
        Role::Nurse,
        Role::Transporter,
        Role::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::Transporter => "TRANSPORTER",
            Role::Member => "MEMBER",
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }

    #[must_use]
    pub fn is_doctor(&self) -> bool {
        matches!(self, Role::Doctor)
    }

    #[must_use]
    pub fn is_nurse(&self) -> bool {
        matches!(self, Role::Nurse)
    }

    #[must_use]
    pub fn is_transporter(&self) -> bool {
        matches!(self, Role::Transporter)
    }

    #[must_use]
    pub fn is_member(&self) -> bool {
        matches!(self, Role::Member)
    }

    /// Facility staff. Admins are not staff.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Role::Manager | Role::Doctor | Role::Nurse | Role::Transporter
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Something a role can be tested against: a single role or a set of roles.
pub trait RoleQuery {
    fn matches(&self, role: Role) -> bool;
}

impl RoleQuery for Role {
    fn matches(&self, role: Role) -> bool {
        *self == role
    }
}

impl RoleQuery for [Role] {
    fn matches(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl<const N: usize> RoleQuery for [Role; N] {
    fn matches(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl RoleQuery for Vec<Role> {
    fn matches(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl<T: RoleQuery + ?Sized> RoleQuery for &T {
    fn matches(&self, role: Role) -> bool {
        (**self).matches(role)
    }
}

//! Permissions derived from a role. Never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    AdminAccess,
    ManagerAccess,
    StaffAccess,
    DoctorAccess,
    NurseAccess,
    TransporterAccess,
    UserAccess,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::AdminAccess,
        Permission::ManagerAccess,
        Permission::StaffAccess,
        Permission::DoctorAccess,
        Permission::NurseAccess,
        Permission::TransporterAccess,
        Permission::UserAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AdminAccess => "ADMIN_ACCESS",
            Permission::ManagerAccess => "MANAGER_ACCESS",
            Permission::StaffAccess => "STAFF_ACCESS",
            Permission::DoctorAccess => "DOCTOR_ACCESS",
            Permission::NurseAccess => "NURSE_ACCESS",
            Permission::TransporterAccess => "TRANSPORTER_ACCESS",
            Permission::UserAccess => "USER_ACCESS",
        }
    }

    /// Whether a principal with `role` holds this permission.
    ///
    /// `authenticated` only matters for [`Permission::UserAccess`]; every other
    /// permission is decided by the role alone, and no role means no access.
    #[must_use]
    pub fn granted_to(&self, role: Option<Role>, authenticated: bool) -> bool {
        match (self, role) {
            (Permission::UserAccess, _) => authenticated,
            (_, None) => false,
            (Permission::AdminAccess, Some(role)) => role.is_admin(),
            (Permission::ManagerAccess, Some(role)) => role.is_admin() || role.is_manager(),
            (Permission::StaffAccess, Some(role)) => role.is_admin() || role.is_staff(),
            (Permission::DoctorAccess, Some(role)) => {
                role.is_admin() || role.is_manager() || role.is_doctor()
            }
            (Permission::NurseAccess, Some(role)) => {
                role.is_admin() || role.is_manager() || role.is_doctor() || role.is_nurse()
            }
            (Permission::TransporterAccess, Some(role)) => {
                role.is_admin() || role.is_manager() || role.is_transporter()
            }
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

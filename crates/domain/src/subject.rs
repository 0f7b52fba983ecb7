//! Subjects whose roles and permissions are checked.

use warden_core::PrincipalId;

use crate::access::RoleId;

/// Subject whose roles or permissions are being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessSubject {
    /// Unauthenticated caller; never matches.
    #[default]
    Guest,
    /// Principal holding roles directly and permissions through roles.
    Principal(PrincipalId),
    /// Role checking its own permissions.
    Role(RoleId),
}

impl AccessSubject {
    /// Returns the principal identifier when the subject is a principal.
    #[must_use]
    pub fn principal_id(&self) -> Option<PrincipalId> {
        match self {
            Self::Principal(principal_id) => Some(*principal_id),
            Self::Guest | Self::Role(_) => None,
        }
    }
}

impl From<Option<PrincipalId>> for AccessSubject {
    fn from(value: Option<PrincipalId>) -> Self {
        value.map(Self::Principal).unwrap_or(Self::Guest)
    }
}

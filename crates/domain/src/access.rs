//! Role, permission and principal entities.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, PrincipalId};

/// Maximum length of a role or permission name.
pub const ACCESS_NAME_MAX_LENGTH: usize = 32;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(i64);

impl RoleId {
    /// Wraps a stored role identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Wraps a stored permission identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated role or permission name.
///
/// Names are matched exactly and must not contain whitespace or `|`, which
/// delimit names inside reference strings such as `"admin|editor"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessName(String);

impl AccessName {
    /// Creates a validated access name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        if value.chars().count() > ACCESS_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "name '{value}' must not exceed {ACCESS_NAME_MAX_LENGTH} characters"
            )));
        }

        if value
            .chars()
            .any(|character| character == '|' || character.is_whitespace())
        {
            return Err(AppError::Validation(format!(
                "name '{value}' must not contain whitespace or '|'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AccessName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Collections addressable by access references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessCollection {
    /// Role records.
    Roles,
    /// Permission records.
    Permissions,
}

impl AccessCollection {
    /// Returns the singular label used in messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Roles => "role",
            Self::Permissions => "permission",
        }
    }
}

/// Entity that can appear as an already-resolved access reference.
pub trait AccessEntity: Clone + Send + Sync {
    /// Collection that stores the entity.
    const COLLECTION: AccessCollection;

    /// Returns the stored numeric identifier.
    fn entity_id(&self) -> i64;
}

/// Named collection of permissions assignable to principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: AccessName,
    fullname: Option<String>,
    description: Option<String>,
}

impl Role {
    /// Creates a role from stored attributes.
    #[must_use]
    pub fn new(
        id: RoleId,
        name: AccessName,
        fullname: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            fullname,
            description,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &AccessName {
        &self.name
    }

    /// Returns the optional human-friendly name.
    #[must_use]
    pub fn fullname(&self) -> Option<&str> {
        self.fullname.as_deref()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl AccessEntity for Role {
    const COLLECTION: AccessCollection = AccessCollection::Roles;

    fn entity_id(&self) -> i64 {
        self.id.as_i64()
    }
}

/// Named atomic capability granted through roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    name: AccessName,
    fullname: Option<String>,
    description: Option<String>,
}

impl Permission {
    /// Creates a permission from stored attributes.
    #[must_use]
    pub fn new(
        id: PermissionId,
        name: AccessName,
        fullname: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            fullname,
            description,
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the unique permission name.
    #[must_use]
    pub fn name(&self) -> &AccessName {
        &self.name
    }

    /// Returns the optional human-friendly name.
    #[must_use]
    pub fn fullname(&self) -> Option<&str> {
        self.fullname.as_deref()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl AccessEntity for Permission {
    const COLLECTION: AccessCollection = AccessCollection::Permissions;

    fn entity_id(&self) -> i64 {
        self.id.as_i64()
    }
}

/// Registered principal able to hold roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    name: String,
}

impl Principal {
    /// Creates a principal from stored attributes.
    #[must_use]
    pub fn new(id: PrincipalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the principal identifier.
    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.id
    }

    /// Returns the unique principal name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::{ACCESS_NAME_MAX_LENGTH, AccessEntity, AccessName, Role, RoleId};

    #[test]
    fn access_name_accepts_snake_case() {
        assert!(AccessName::new("index_users").is_ok());
    }

    #[test]
    fn access_name_rejects_delimiters() {
        assert!(AccessName::new("admin|editor").is_err());
        assert!(AccessName::new("admin editor").is_err());
        assert!(AccessName::new("").is_err());
    }

    #[test]
    fn access_name_rejects_overlong_values() {
        let value = "a".repeat(ACCESS_NAME_MAX_LENGTH + 1);
        assert!(AccessName::new(value).is_err());
    }

    #[test]
    fn role_exposes_entity_id() {
        let name = AccessName::new("admin").unwrap_or_else(|_| unreachable!());
        let role = Role::new(RoleId::new(7), name, None, None);
        assert_eq!(role.entity_id(), 7);
    }
}

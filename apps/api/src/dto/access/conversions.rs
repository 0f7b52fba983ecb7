use std::str::FromStr;

use warden_application::{AccessItemInput, AssociationChanges, RoleAssignment};
use warden_core::AppResult;
use warden_domain::{
    AccessEntity, AccessName, AccessReferences, LookupColumn, Permission, Principal, Role,
};

use super::{
    AssociationChangesResponse, AssociationRequest, CreateAccessItemRequest, PermissionResponse,
    PrincipalResponse, RoleAssignmentResponse, RoleResponse,
};

impl CreateAccessItemRequest {
    pub fn into_input(self) -> AppResult<AccessItemInput> {
        Ok(AccessItemInput {
            name: AccessName::new(self.name)?,
            fullname: self.fullname.filter(|value| !value.trim().is_empty()),
            description: self.description.filter(|value| !value.trim().is_empty()),
        })
    }
}

impl AssociationRequest {
    /// Returns the parsed references; a missing list means none.
    pub fn references<E: AccessEntity>(&self) -> AppResult<AccessReferences<E>> {
        self.references
            .as_ref()
            .map(AccessReferences::from_json)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn column(&self) -> AppResult<LookupColumn> {
        self.column
            .as_deref()
            .map(LookupColumn::from_str)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Sync removes unlisted links unless `detaching` is explicitly false.
    pub fn detaching(&self) -> bool {
        self.detaching.unwrap_or(true)
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().as_str().to_owned(),
            fullname: value.fullname().map(str::to_owned),
            description: value.description().map(str::to_owned),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().as_str().to_owned(),
            fullname: value.fullname().map(str::to_owned),
            description: value.description().map(str::to_owned),
        }
    }
}

impl From<Principal> for PrincipalResponse {
    fn from(value: Principal) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().to_owned(),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            principal_id: value.principal_id.as_i64(),
            role: RoleResponse::from(value.role),
            assigned_at: value.assigned_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<AssociationChanges> for AssociationChangesResponse {
    fn from(value: AssociationChanges) -> Self {
        Self {
            attached: value.attached,
            detached: value.detached,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use warden_domain::{LookupColumn, Role};

    use crate::dto::{AssociationRequest, CreateAccessItemRequest};

    #[test]
    fn association_request_defaults() {
        let request = AssociationRequest {
            references: None,
            column: None,
            detaching: None,
        };

        assert!(request.references::<Role>().is_ok_and(|references| references.is_empty()));
        assert_eq!(request.column().ok(), Some(LookupColumn::Name));
        assert!(request.detaching());
    }

    #[test]
    fn association_request_parses_transport_values() {
        let request = AssociationRequest {
            references: Some(json!(["admin", 3, {"id": 4}])),
            column: Some("fullname".to_owned()),
            detaching: Some(false),
        };

        assert_eq!(request.references::<Role>().map(|references| references.len()).ok(), Some(3));
        assert_eq!(request.column().ok(), Some(LookupColumn::Fullname));
        assert!(!request.detaching());
    }

    #[test]
    fn association_request_rejects_unknown_columns() {
        let request = AssociationRequest {
            references: Some(json!("admin")),
            column: Some("email; drop table".to_owned()),
            detaching: None,
        };

        assert!(request.column().is_err());
    }

    #[test]
    fn create_request_validates_names() {
        let request = CreateAccessItemRequest {
            name: "has space".to_owned(),
            fullname: None,
            description: None,
        };

        assert!(request.into_input().is_err());
    }
}

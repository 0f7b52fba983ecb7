use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_core::{AppResult, PrincipalId};
use warden_domain::{
    AccessCollection, AccessName, LookupColumn, Permission, PermissionId, Principal, Role, RoleId,
};

/// Pivot mutated by attach, detach and sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    /// Principal to role links.
    PrincipalRoles,
    /// Role to permission links.
    RolePermissions,
}

impl Association {
    /// Returns the collection on the target side of the pivot.
    #[must_use]
    pub fn target(&self) -> AccessCollection {
        match self {
            Self::PrincipalRoles => AccessCollection::Roles,
            Self::RolePermissions => AccessCollection::Permissions,
        }
    }

    /// Returns a stable value for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrincipalRoles => "principal_roles",
            Self::RolePermissions => "role_permissions",
        }
    }
}

/// Relation walked by a membership count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Roles held directly by a principal.
    PrincipalRole,
    /// Permissions owned directly by a role.
    RolePermission,
    /// Permissions held by a principal through any of its roles.
    PrincipalPermission,
}

impl Relation {
    /// Returns a stable value for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrincipalRole => "principal_role",
            Self::RolePermission => "role_permission",
            Self::PrincipalPermission => "principal_permission",
        }
    }
}

/// Input payload for creating roles and permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessItemInput {
    /// Unique name.
    pub name: AccessName,
    /// Optional human-friendly name.
    pub fullname: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// Role held by a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Principal holding the role.
    pub principal_id: PrincipalId,
    /// Assigned role.
    pub role: Role,
    /// When the link was created.
    pub assigned_at: DateTime<Utc>,
    /// When the link was last touched.
    pub updated_at: DateTime<Utc>,
}

/// Target ids added and removed by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationChanges {
    /// Newly linked ids.
    pub attached: Vec<i64>,
    /// Unlinked ids.
    pub detached: Vec<i64>,
}

impl AssociationChanges {
    /// Returns whether the mutation changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// Repository port for roles, permissions and principals.
#[async_trait]
pub trait AccessCatalogRepository: Send + Sync {
    /// Creates a role with a unique name.
    async fn create_role(&self, input: AccessItemInput) -> AppResult<Role>;

    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Deletes a role together with all of its links.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Creates a permission with a unique name.
    async fn create_permission(&self, input: AccessItemInput) -> AppResult<Permission>;

    /// Finds a permission by id.
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Lists permissions ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Deletes a permission together with its role links.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Looks up an id by exact match on a lookup column.
    async fn find_id_by_column(
        &self,
        collection: AccessCollection,
        column: LookupColumn,
        value: &str,
    ) -> AppResult<Option<i64>>;

    /// Registers a principal with a unique name.
    async fn register_principal(&self, name: &str) -> AppResult<Principal>;

    /// Finds a principal by id.
    async fn find_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>>;

    /// Finds a principal by name.
    async fn find_principal_by_name(&self, name: &str) -> AppResult<Option<Principal>>;

    /// Deletes a principal together with its role links.
    async fn delete_principal(&self, principal_id: PrincipalId) -> AppResult<()>;
}

/// Repository port for pivot mutations and membership counts.
#[async_trait]
pub trait AccessAssociationRepository: Send + Sync {
    /// Links the owner to every target that is not yet linked.
    ///
    /// Returns the newly linked ids. Unknown target ids fail with `NotFound`.
    async fn attach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
    ) -> AppResult<Vec<i64>>;

    /// Unlinks the listed targets, or every target when `target_ids` is `None`.
    ///
    /// Returns the unlinked ids.
    async fn detach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: Option<&[i64]>,
    ) -> AppResult<Vec<i64>>;

    /// Makes the owner's links equal to `target_ids`, keeping extra links when
    /// `detaching` is false.
    async fn sync(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
        detaching: bool,
    ) -> AppResult<AssociationChanges>;

    /// Counts how many of `target_ids` the owner holds through `relation`.
    async fn count_held(
        &self,
        relation: Relation,
        owner_id: i64,
        target_ids: &BTreeSet<i64>,
    ) -> AppResult<usize>;

    /// Lists roles held by a principal, ordered by role name.
    async fn list_principal_roles(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>>;

    /// Lists permissions owned by a role, ordered by name.
    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Lists the distinct permissions a principal holds through its roles.
    async fn list_principal_permissions(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>>;
}

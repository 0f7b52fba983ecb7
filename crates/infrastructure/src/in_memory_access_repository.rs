use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use warden_application::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, Association,
    AssociationChanges, Relation, RoleAssignment,
};
use warden_core::{AppError, AppResult, PrincipalId};
use warden_domain::{
    AccessCollection, AccessName, LookupColumn, Permission, PermissionId, Principal, Role, RoleId,
};

#[cfg(test)]
mod tests;

/// In-memory access repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    state: RwLock<AccessState>,
}

#[derive(Debug, Default)]
struct AccessState {
    next_id: i64,
    roles: HashMap<i64, Role>,
    permissions: HashMap<i64, Permission>,
    principals: HashMap<i64, Principal>,
    principal_roles: BTreeMap<(i64, i64), DateTime<Utc>>,
    role_permissions: BTreeMap<(i64, i64), DateTime<Utc>>,
}

impl AccessState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn name_taken(&self, collection: AccessCollection, name: &AccessName) -> bool {
        match collection {
            AccessCollection::Roles => self.roles.values().any(|role| role.name() == name),
            AccessCollection::Permissions => self
                .permissions
                .values()
                .any(|permission| permission.name() == name),
        }
    }

    fn links(&self, association: Association) -> &BTreeMap<(i64, i64), DateTime<Utc>> {
        match association {
            Association::PrincipalRoles => &self.principal_roles,
            Association::RolePermissions => &self.role_permissions,
        }
    }

    fn links_mut(&mut self, association: Association) -> &mut BTreeMap<(i64, i64), DateTime<Utc>> {
        match association {
            Association::PrincipalRoles => &mut self.principal_roles,
            Association::RolePermissions => &mut self.role_permissions,
        }
    }

    fn owner_exists(&self, association: Association, owner_id: i64) -> bool {
        match association {
            Association::PrincipalRoles => self.principals.contains_key(&owner_id),
            Association::RolePermissions => self.roles.contains_key(&owner_id),
        }
    }

    fn target_exists(&self, association: Association, target_id: i64) -> bool {
        match association {
            Association::PrincipalRoles => self.roles.contains_key(&target_id),
            Association::RolePermissions => self.permissions.contains_key(&target_id),
        }
    }

    fn linked_targets(&self, association: Association, owner_id: i64) -> BTreeSet<i64> {
        self.links(association)
            .range((owner_id, i64::MIN)..=(owner_id, i64::MAX))
            .map(|((_, target_id), _)| *target_id)
            .collect()
    }

    fn held(&self, relation: Relation, owner_id: i64) -> BTreeSet<i64> {
        match relation {
            Relation::PrincipalRole => self.linked_targets(Association::PrincipalRoles, owner_id),
            Relation::RolePermission => {
                self.linked_targets(Association::RolePermissions, owner_id)
            }
            Relation::PrincipalPermission => self
                .linked_targets(Association::PrincipalRoles, owner_id)
                .into_iter()
                .flat_map(|role_id| self.linked_targets(Association::RolePermissions, role_id))
                .collect(),
        }
    }

    fn insert_links(
        &mut self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        if !self.owner_exists(association, owner_id) {
            return Err(AppError::NotFound(format!(
                "{} link references a missing record",
                association.as_str()
            )));
        }
        if let Some(missing) = target_ids
            .iter()
            .find(|target_id| !self.target_exists(association, **target_id))
        {
            return Err(AppError::NotFound(format!(
                "{} '{missing}' was not found",
                association.target().label()
            )));
        }

        let now = Utc::now();
        let links = self.links_mut(association);
        let mut attached = Vec::new();
        for target_id in target_ids {
            if !links.contains_key(&(owner_id, *target_id)) {
                links.insert((owner_id, *target_id), now);
                attached.push(*target_id);
            }
        }

        Ok(attached)
    }

    fn remove_links(
        &mut self,
        association: Association,
        owner_id: i64,
        keep: impl Fn(i64) -> bool,
    ) -> Vec<i64> {
        let removed: Vec<i64> = self
            .linked_targets(association, owner_id)
            .into_iter()
            .filter(|target_id| !keep(*target_id))
            .collect();
        let links = self.links_mut(association);
        for target_id in &removed {
            links.remove(&(owner_id, *target_id));
        }

        removed
    }

    fn sorted<T>(values: impl Iterator<Item = T>, name: impl Fn(&T) -> &str) -> Vec<T> {
        let mut values: Vec<T> = values.collect();
        values.sort_by(|left, right| name(left).cmp(name(right)));
        values
    }
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessCatalogRepository for InMemoryAccessRepository {
    async fn create_role(&self, input: AccessItemInput) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.name_taken(AccessCollection::Roles, &input.name) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        let id = state.allocate_id();
        let role = Role::new(RoleId::new(id), input.name, input.fullname, input.description);
        state.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id.as_i64()).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(AccessState::sorted(state.roles.values().cloned(), |role| {
            role.name().as_str()
        }))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let id = role_id.as_i64();
        if state.roles.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        state.role_permissions.retain(|(role, _), _| *role != id);
        state.principal_roles.retain(|(_, role), _| *role != id);
        Ok(())
    }

    async fn create_permission(&self, input: AccessItemInput) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        if state.name_taken(AccessCollection::Permissions, &input.name) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.name
            )));
        }

        let id = state.allocate_id();
        let permission = Permission::new(
            PermissionId::new(id),
            input.name,
            input.fullname,
            input.description,
        );
        state.permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .get(&permission_id.as_i64())
            .cloned())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(AccessState::sorted(
            state.permissions.values().cloned(),
            |permission| permission.name().as_str(),
        ))
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let id = permission_id.as_i64();
        if state.permissions.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        state
            .role_permissions
            .retain(|(_, permission), _| *permission != id);
        Ok(())
    }

    async fn find_id_by_column(
        &self,
        collection: AccessCollection,
        column: LookupColumn,
        value: &str,
    ) -> AppResult<Option<i64>> {
        let state = self.state.read().await;
        let matches = |name: &AccessName, fullname: Option<&str>| match column {
            LookupColumn::Name => name.as_str() == value,
            LookupColumn::Fullname => fullname == Some(value),
        };

        Ok(match collection {
            AccessCollection::Roles => state
                .roles
                .values()
                .filter(|role| matches(role.name(), role.fullname()))
                .map(|role| role.id().as_i64())
                .min(),
            AccessCollection::Permissions => state
                .permissions
                .values()
                .filter(|permission| matches(permission.name(), permission.fullname()))
                .map(|permission| permission.id().as_i64())
                .min(),
        })
    }

    async fn register_principal(&self, name: &str) -> AppResult<Principal> {
        let mut state = self.state.write().await;
        if state
            .principals
            .values()
            .any(|principal| principal.name() == name)
        {
            return Err(AppError::Conflict(format!(
                "principal '{name}' already exists"
            )));
        }

        let id = state.allocate_id();
        let principal = Principal::new(PrincipalId::new(id), name);
        state.principals.insert(id, principal.clone());
        Ok(principal)
    }

    async fn find_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        Ok(self
            .state
            .read()
            .await
            .principals
            .get(&principal_id.as_i64())
            .cloned())
    }

    async fn find_principal_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .state
            .read()
            .await
            .principals
            .values()
            .find(|principal| principal.name() == name)
            .cloned())
    }

    async fn delete_principal(&self, principal_id: PrincipalId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let id = principal_id.as_i64();
        if state.principals.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' was not found"
            )));
        }

        state
            .principal_roles
            .retain(|(principal, _), _| *principal != id);
        Ok(())
    }
}

#[async_trait]
impl AccessAssociationRepository for InMemoryAccessRepository {
    async fn attach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        self.state
            .write()
            .await
            .insert_links(association, owner_id, target_ids)
    }

    async fn detach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: Option<&[i64]>,
    ) -> AppResult<Vec<i64>> {
        Ok(self
            .state
            .write()
            .await
            .remove_links(association, owner_id, |target_id| {
                target_ids.is_some_and(|ids| !ids.contains(&target_id))
            }))
    }

    async fn sync(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
        detaching: bool,
    ) -> AppResult<AssociationChanges> {
        let mut state = self.state.write().await;
        // Validate before removing anything so a failed sync leaves links untouched.
        if let Some(missing) = target_ids
            .iter()
            .find(|target_id| !state.target_exists(association, **target_id))
        {
            return Err(AppError::NotFound(format!(
                "{} '{missing}' was not found",
                association.target().label()
            )));
        }

        let detached = if detaching {
            state.remove_links(association, owner_id, |target_id| {
                target_ids.contains(&target_id)
            })
        } else {
            Vec::new()
        };
        let attached = state.insert_links(association, owner_id, target_ids)?;

        Ok(AssociationChanges { attached, detached })
    }

    async fn count_held(
        &self,
        relation: Relation,
        owner_id: i64,
        target_ids: &BTreeSet<i64>,
    ) -> AppResult<usize> {
        Ok(self
            .state
            .read()
            .await
            .held(relation, owner_id)
            .intersection(target_ids)
            .count())
    }

    async fn list_principal_roles(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.read().await;
        let owner_id = principal_id.as_i64();
        let assignments = state
            .principal_roles
            .range((owner_id, i64::MIN)..=(owner_id, i64::MAX))
            .filter_map(|((_, role_id), assigned_at)| {
                state.roles.get(role_id).map(|role| RoleAssignment {
                    principal_id,
                    role: role.clone(),
                    assigned_at: *assigned_at,
                    updated_at: *assigned_at,
                })
            });

        Ok(AccessState::sorted(assignments, |assignment| {
            assignment.role.name().as_str()
        }))
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let permissions = state
            .held(Relation::RolePermission, role_id.as_i64())
            .into_iter()
            .filter_map(|permission_id| state.permissions.get(&permission_id).cloned());

        Ok(AccessState::sorted(permissions, |permission| {
            permission.name().as_str()
        }))
    }

    async fn list_principal_permissions(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let permissions = state
            .held(Relation::PrincipalPermission, principal_id.as_i64())
            .into_iter()
            .filter_map(|permission_id| state.permissions.get(&permission_id).cloned());

        Ok(AccessState::sorted(permissions, |permission| {
            permission.name().as_str()
        }))
    }
}

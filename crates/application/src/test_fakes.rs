use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use warden_core::{AppError, AppResult, PrincipalId};
use warden_domain::{
    AccessCollection, AccessName, LookupColumn, Permission, PermissionId, Principal, Role, RoleId,
};

use crate::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, Association,
    AssociationChanges, Relation, RoleAssignment,
};

#[derive(Default)]
struct FakeState {
    next_id: i64,
    roles: BTreeMap<i64, Role>,
    permissions: BTreeMap<i64, Permission>,
    principals: BTreeMap<i64, Principal>,
    principal_roles: BTreeSet<(i64, i64)>,
    role_permissions: BTreeSet<(i64, i64)>,
}

impl FakeState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn links(&mut self, association: Association) -> &mut BTreeSet<(i64, i64)> {
        match association {
            Association::PrincipalRoles => &mut self.principal_roles,
            Association::RolePermissions => &mut self.role_permissions,
        }
    }

    fn target_exists(&self, association: Association, target_id: i64) -> bool {
        match association {
            Association::PrincipalRoles => self.roles.contains_key(&target_id),
            Association::RolePermissions => self.permissions.contains_key(&target_id),
        }
    }

    fn held_ids(&self, relation: Relation, owner_id: i64) -> BTreeSet<i64> {
        let direct = |links: &BTreeSet<(i64, i64)>, owner: i64| -> BTreeSet<i64> {
            links
                .iter()
                .filter(|(stored_owner, _)| *stored_owner == owner)
                .map(|(_, target)| *target)
                .collect()
        };

        match relation {
            Relation::PrincipalRole => direct(&self.principal_roles, owner_id),
            Relation::RolePermission => direct(&self.role_permissions, owner_id),
            Relation::PrincipalPermission => direct(&self.principal_roles, owner_id)
                .into_iter()
                .flat_map(|role_id| direct(&self.role_permissions, role_id))
                .collect(),
        }
    }
}

/// In-process store used by service tests.
#[derive(Default)]
pub(crate) struct FakeAccessStore {
    state: Mutex<FakeState>,
}

impl FakeAccessStore {
    pub(crate) async fn seed_role(&self, name: &str, fullname: Option<&str>) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let name = AccessName::new(name).unwrap_or_else(|_| unreachable!());
        state.roles.insert(
            id,
            Role::new(RoleId::new(id), name, fullname.map(str::to_owned), None),
        );
        id
    }

    pub(crate) async fn seed_permission(&self, name: &str) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let name = AccessName::new(name).unwrap_or_else(|_| unreachable!());
        state.permissions.insert(
            id,
            Permission::new(PermissionId::new(id), name, None, None),
        );
        id
    }

    pub(crate) async fn seed_principal(&self, name: &str) -> PrincipalId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state
            .principals
            .insert(id, Principal::new(PrincipalId::new(id), name));
        PrincipalId::new(id)
    }

    pub(crate) async fn link(&self, association: Association, owner_id: i64, target_id: i64) {
        self.state
            .lock()
            .await
            .links(association)
            .insert((owner_id, target_id));
    }

    pub(crate) async fn role_id(&self, name: &str) -> i64 {
        self.state
            .lock()
            .await
            .roles
            .values()
            .find(|role| role.name().as_str() == name)
            .map(|role| role.id().as_i64())
            .unwrap_or_default()
    }

    pub(crate) async fn held(&self, relation: Relation, owner_id: i64) -> BTreeSet<i64> {
        self.state.lock().await.held_ids(relation, owner_id)
    }
}

#[async_trait]
impl AccessCatalogRepository for FakeAccessStore {
    async fn create_role(&self, input: AccessItemInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state.roles.values().any(|role| role.name() == &input.name) {
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
        Ok(self.state.lock().await.roles.get(&role_id.as_i64()).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.state.lock().await.roles.values().cloned().collect())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let id = role_id.as_i64();
        if state.roles.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }
        state.role_permissions.retain(|(role, _)| *role != id);
        state.principal_roles.retain(|(_, role)| *role != id);
        Ok(())
    }

    async fn create_permission(&self, input: AccessItemInput) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
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
            .lock()
            .await
            .permissions
            .get(&permission_id.as_i64())
            .cloned())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.state.lock().await.permissions.values().cloned().collect())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let id = permission_id.as_i64();
        if state.permissions.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }
        state.role_permissions.retain(|(_, permission)| *permission != id);
        Ok(())
    }

    async fn find_id_by_column(
        &self,
        collection: AccessCollection,
        column: LookupColumn,
        value: &str,
    ) -> AppResult<Option<i64>> {
        let state = self.state.lock().await;
        let matches = |name: &AccessName, fullname: Option<&str>| match column {
            LookupColumn::Name => name.as_str() == value,
            LookupColumn::Fullname => fullname == Some(value),
        };

        Ok(match collection {
            AccessCollection::Roles => state
                .roles
                .values()
                .find(|role| matches(role.name(), role.fullname()))
                .map(|role| role.id().as_i64()),
            AccessCollection::Permissions => state
                .permissions
                .values()
                .find(|permission| matches(permission.name(), permission.fullname()))
                .map(|permission| permission.id().as_i64()),
        })
    }

    async fn register_principal(&self, name: &str) -> AppResult<Principal> {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let principal = Principal::new(PrincipalId::new(id), name);
        state.principals.insert(id, principal.clone());
        Ok(principal)
    }

    async fn find_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        Ok(self
            .state
            .lock()
            .await
            .principals
            .get(&principal_id.as_i64())
            .cloned())
    }

    async fn find_principal_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .state
            .lock()
            .await
            .principals
            .values()
            .find(|principal| principal.name() == name)
            .cloned())
    }

    async fn delete_principal(&self, principal_id: PrincipalId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let id = principal_id.as_i64();
        if state.principals.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' was not found"
            )));
        }
        state.principal_roles.retain(|(principal, _)| *principal != id);
        Ok(())
    }
}

#[async_trait]
impl AccessAssociationRepository for FakeAccessStore {
    async fn attach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        let mut state = self.state.lock().await;
        if let Some(missing) = target_ids
            .iter()
            .find(|target_id| !state.target_exists(association, **target_id))
        {
            return Err(AppError::NotFound(format!(
                "{} '{missing}' was not found",
                association.target().label()
            )));
        }

        let links = state.links(association);
        Ok(target_ids
            .iter()
            .copied()
            .filter(|target_id| links.insert((owner_id, *target_id)))
            .collect())
    }

    async fn detach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: Option<&[i64]>,
    ) -> AppResult<Vec<i64>> {
        let mut state = self.state.lock().await;
        let links = state.links(association);
        let removed: Vec<i64> = links
            .iter()
            .filter(|(owner, target)| {
                *owner == owner_id && target_ids.is_none_or(|ids| ids.contains(target))
            })
            .map(|(_, target)| *target)
            .collect();
        for target_id in &removed {
            links.remove(&(owner_id, *target_id));
        }
        Ok(removed)
    }

    async fn sync(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
        detaching: bool,
    ) -> AppResult<AssociationChanges> {
        let detached = if detaching {
            let current: Vec<i64> = self
                .held(
                    match association {
                        Association::PrincipalRoles => Relation::PrincipalRole,
                        Association::RolePermissions => Relation::RolePermission,
                    },
                    owner_id,
                )
                .await
                .into_iter()
                .filter(|target_id| !target_ids.contains(target_id))
                .collect();
            self.detach(association, owner_id, Some(&current)).await?
        } else {
            Vec::new()
        };

        let attached = self.attach(association, owner_id, target_ids).await?;
        Ok(AssociationChanges { attached, detached })
    }

    async fn count_held(
        &self,
        relation: Relation,
        owner_id: i64,
        target_ids: &BTreeSet<i64>,
    ) -> AppResult<usize> {
        Ok(self
            .held(relation, owner_id)
            .await
            .intersection(target_ids)
            .count())
    }

    async fn list_principal_roles(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.lock().await;
        let now = Utc::now();
        Ok(state
            .held_ids(Relation::PrincipalRole, principal_id.as_i64())
            .into_iter()
            .filter_map(|role_id| state.roles.get(&role_id).cloned())
            .map(|role| RoleAssignment {
                principal_id,
                role,
                assigned_at: now,
                updated_at: now,
            })
            .collect())
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .held_ids(Relation::RolePermission, role_id.as_i64())
            .into_iter()
            .filter_map(|permission_id| state.permissions.get(&permission_id).cloned())
            .collect())
    }

    async fn list_principal_permissions(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .held_ids(Relation::PrincipalPermission, principal_id.as_i64())
            .into_iter()
            .filter_map(|permission_id| state.permissions.get(&permission_id).cloned())
            .collect())
    }
}

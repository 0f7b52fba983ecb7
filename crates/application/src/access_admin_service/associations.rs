use super::*;

impl AccessAdminService {
    /// Assigns roles to a principal. Roles already held are left untouched.
    pub async fn attach_roles(
        &self,
        principal_id: PrincipalId,
        roles: &AccessReferences<Role>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_principal(principal_id).await?;
        self.attach(Association::PrincipalRoles, principal_id.as_i64(), roles, column)
            .await
    }

    /// Removes roles from a principal; an empty list removes every role.
    pub async fn detach_roles(
        &self,
        principal_id: PrincipalId,
        roles: &AccessReferences<Role>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_principal(principal_id).await?;
        self.detach(Association::PrincipalRoles, principal_id.as_i64(), roles, column)
            .await
    }

    /// Makes the principal's roles match the list.
    ///
    /// With `detaching` false, roles missing from the list are kept.
    pub async fn sync_roles(
        &self,
        principal_id: PrincipalId,
        roles: &AccessReferences<Role>,
        detaching: bool,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_principal(principal_id).await?;
        self.sync(
            Association::PrincipalRoles,
            principal_id.as_i64(),
            roles,
            detaching,
            column,
        )
        .await
    }

    /// Grants permissions to a role.
    pub async fn attach_permissions(
        &self,
        role_id: RoleId,
        permissions: &AccessReferences<Permission>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_role(role_id).await?;
        self.attach(
            Association::RolePermissions,
            role_id.as_i64(),
            permissions,
            column,
        )
        .await
    }

    /// Revokes permissions from a role; an empty list revokes every permission.
    pub async fn detach_permissions(
        &self,
        role_id: RoleId,
        permissions: &AccessReferences<Permission>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_role(role_id).await?;
        self.detach(
            Association::RolePermissions,
            role_id.as_i64(),
            permissions,
            column,
        )
        .await
    }

    /// Makes the role's permissions match the list.
    pub async fn sync_permissions(
        &self,
        role_id: RoleId,
        permissions: &AccessReferences<Permission>,
        detaching: bool,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        self.find_role(role_id).await?;
        self.sync(
            Association::RolePermissions,
            role_id.as_i64(),
            permissions,
            detaching,
            column,
        )
        .await
    }

    /// Lists roles held by a principal with assignment timestamps.
    pub async fn principal_roles(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.find_principal(principal_id).await?;
        self.associations.list_principal_roles(principal_id).await
    }

    /// Lists the distinct permissions a principal holds through its roles.
    pub async fn principal_permissions(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>> {
        self.find_principal(principal_id).await?;
        self.associations
            .list_principal_permissions(principal_id)
            .await
    }

    /// Lists permissions owned by a role.
    pub async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        self.find_role(role_id).await?;
        self.associations.list_role_permissions(role_id).await
    }

    async fn attach<E: AccessEntity>(
        &self,
        association: Association,
        owner_id: i64,
        references: &AccessReferences<E>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        let target_ids = self.resolver.resolve(references, column).await?;
        if target_ids.is_empty() {
            return Ok(AssociationChanges::default());
        }

        let attached = self
            .associations
            .attach(association, owner_id, &target_ids)
            .await?;
        info!(
            association = association.as_str(),
            owner_id,
            attached = attached.len(),
            "attached access links"
        );

        Ok(AssociationChanges {
            attached,
            detached: Vec::new(),
        })
    }

    async fn detach<E: AccessEntity>(
        &self,
        association: Association,
        owner_id: i64,
        references: &AccessReferences<E>,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        let detached = if references.is_empty() {
            self.associations.detach(association, owner_id, None).await?
        } else {
            let target_ids = self.resolver.resolve(references, column).await?;
            self.associations
                .detach(association, owner_id, Some(&target_ids))
                .await?
        };
        info!(
            association = association.as_str(),
            owner_id,
            detached = detached.len(),
            "detached access links"
        );

        Ok(AssociationChanges {
            attached: Vec::new(),
            detached,
        })
    }

    async fn sync<E: AccessEntity>(
        &self,
        association: Association,
        owner_id: i64,
        references: &AccessReferences<E>,
        detaching: bool,
        column: LookupColumn,
    ) -> AppResult<AssociationChanges> {
        let target_ids = self.resolver.resolve(references, column).await?;
        let changes = self
            .associations
            .sync(association, owner_id, &target_ids, detaching)
            .await?;
        info!(
            association = association.as_str(),
            owner_id,
            detaching,
            attached = changes.attached.len(),
            detached = changes.detached.len(),
            "synced access links"
        );

        Ok(changes)
    }
}

use super::*;

impl AccessAdminService {
    /// Creates a role with a unique name.
    pub async fn create_role(&self, input: AccessItemInput) -> AppResult<Role> {
        let role = self.catalog.create_role(input).await?;
        info!(role_id = role.id().as_i64(), name = %role.name(), "created role");
        Ok(role)
    }

    /// Finds a role by id.
    pub async fn find_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.catalog
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    /// Finds a role by its unique name.
    pub async fn find_role_by_name(&self, name: &str) -> AppResult<Role> {
        let role_id = self
            .find_id_by_name(AccessCollection::Roles, name)
            .await?;
        self.find_role(RoleId::new(role_id)).await
    }

    /// Lists roles ordered by name.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.catalog.list_roles().await
    }

    /// Deletes a role together with its principal and permission links.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.catalog.delete_role(role_id).await?;
        info!(role_id = role_id.as_i64(), "deleted role");
        Ok(())
    }

    /// Creates a permission with a unique name.
    pub async fn create_permission(&self, input: AccessItemInput) -> AppResult<Permission> {
        let permission = self.catalog.create_permission(input).await?;
        info!(
            permission_id = permission.id().as_i64(),
            name = %permission.name(),
            "created permission"
        );
        Ok(permission)
    }

    /// Finds a permission by id.
    pub async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.catalog
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' was not found"))
            })
    }

    /// Finds a permission by its unique name.
    pub async fn find_permission_by_name(&self, name: &str) -> AppResult<Permission> {
        let permission_id = self
            .find_id_by_name(AccessCollection::Permissions, name)
            .await?;
        self.find_permission(PermissionId::new(permission_id)).await
    }

    /// Lists permissions ordered by name.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.catalog.list_permissions().await
    }

    /// Deletes a permission together with its role links.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.catalog.delete_permission(permission_id).await?;
        info!(permission_id = permission_id.as_i64(), "deleted permission");
        Ok(())
    }

    /// Registers a principal that roles can be assigned to.
    pub async fn register_principal(&self, name: &str) -> AppResult<Principal> {
        let name = NonEmptyString::new(name.trim())?;

        let principal = self.catalog.register_principal(name.as_str()).await?;
        info!(
            principal_id = principal.id().as_i64(),
            name = principal.name(),
            "registered principal"
        );
        Ok(principal)
    }

    /// Finds a principal by id.
    pub async fn find_principal(&self, principal_id: PrincipalId) -> AppResult<Principal> {
        self.catalog
            .find_principal(principal_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("principal '{principal_id}' was not found"))
            })
    }

    /// Finds a principal by name.
    pub async fn find_principal_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        self.catalog.find_principal_by_name(name).await
    }

    /// Deletes a principal together with its role links.
    pub async fn delete_principal(&self, principal_id: PrincipalId) -> AppResult<()> {
        self.catalog.delete_principal(principal_id).await?;
        info!(principal_id = principal_id.as_i64(), "deleted principal");
        Ok(())
    }

    async fn find_id_by_name(&self, collection: AccessCollection, name: &str) -> AppResult<i64> {
        self.catalog
            .find_id_by_column(collection, LookupColumn::Name, name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} '{name}' was not found", collection.label()))
            })
    }
}

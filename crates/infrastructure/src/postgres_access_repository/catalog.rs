use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use warden_application::{AccessCatalogRepository, AccessItemInput};
use warden_domain::LookupColumn;

use super::*;

impl PostgresAccessRepository {
    async fn insert_item(
        &self,
        collection: AccessCollection,
        input: AccessItemInput,
    ) -> AppResult<AccessItemRow> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("INSERT INTO ");
        builder.push(table_for(collection));
        builder.push(" (name, fullname, description) VALUES (");
        builder.push_bind(input.name.as_str().to_owned());
        builder.push(", ");
        builder.push_bind(input.fullname.clone());
        builder.push(", ");
        builder.push_bind(input.description.clone());
        builder.push(") RETURNING id, name, fullname, description");

        builder
            .build_query_as::<AccessItemRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_unique_violation(error, collection.label(), input.name.as_str())
            })
    }

    async fn select_item(
        &self,
        collection: AccessCollection,
        id: i64,
    ) -> AppResult<Option<AccessItemRow>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, fullname, description FROM ");
        builder.push(table_for(collection));
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        builder
            .build_query_as::<AccessItemRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find {}: {error}", collection.label()))
            })
    }

    async fn select_items(&self, collection: AccessCollection) -> AppResult<Vec<AccessItemRow>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, fullname, description FROM ");
        builder.push(table_for(collection));
        builder.push(" ORDER BY name");

        builder
            .build_query_as::<AccessItemRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list {}s: {error}", collection.label()))
            })
    }

    /// Removes the item and every pivot row pointing at it in one transaction.
    async fn delete_item(
        &self,
        collection: AccessCollection,
        id: i64,
        pivots: &[(&str, &str)],
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        for (table, column) in pivots {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("DELETE FROM ");
            builder.push(*table);
            builder.push(" WHERE ");
            builder.push(*column);
            builder.push(" = ");
            builder.push_bind(id);
            builder
                .build()
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete links from {table}: {error}"))
                })?;
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("DELETE FROM ");
        builder.push(table_for(collection));
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        let deleted = builder
            .build()
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete {}: {error}", collection.label()))
            })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} '{id}' was not found",
                collection.label()
            )));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}

#[async_trait]
impl AccessCatalogRepository for PostgresAccessRepository {
    async fn create_role(&self, input: AccessItemInput) -> AppResult<Role> {
        self.insert_item(AccessCollection::Roles, input)
            .await?
            .into_role()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.select_item(AccessCollection::Roles, role_id.as_i64())
            .await?
            .map(AccessItemRow::into_role)
            .transpose()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.select_items(AccessCollection::Roles)
            .await?
            .into_iter()
            .map(AccessItemRow::into_role)
            .collect()
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_item(
            AccessCollection::Roles,
            role_id.as_i64(),
            &[
                ("access_permission_role", "role_id"),
                ("access_role_user", "role_id"),
            ],
        )
        .await
    }

    async fn create_permission(&self, input: AccessItemInput) -> AppResult<Permission> {
        self.insert_item(AccessCollection::Permissions, input)
            .await?
            .into_permission()
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        self.select_item(AccessCollection::Permissions, permission_id.as_i64())
            .await?
            .map(AccessItemRow::into_permission)
            .transpose()
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.select_items(AccessCollection::Permissions)
            .await?
            .into_iter()
            .map(AccessItemRow::into_permission)
            .collect()
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_item(
            AccessCollection::Permissions,
            permission_id.as_i64(),
            &[("access_permission_role", "permission_id")],
        )
        .await
    }

    async fn find_id_by_column(
        &self,
        collection: AccessCollection,
        column: LookupColumn,
        value: &str,
    ) -> AppResult<Option<i64>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT id FROM ");
        builder.push(table_for(collection));
        builder.push(" WHERE ");
        builder.push(column.as_str());
        builder.push(" = ");
        builder.push_bind(value);
        builder.push(" ORDER BY id LIMIT 1");

        builder
            .build_query_scalar::<i64>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to resolve {} by {}: {error}",
                    collection.label(),
                    column.as_str()
                ))
            })
    }

    async fn register_principal(&self, name: &str) -> AppResult<Principal> {
        sqlx::query_as::<_, PrincipalRow>(
            r#"
            INSERT INTO access_principals (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map(Principal::from)
        .map_err(|error| map_unique_violation(error, "principal", name))
    }

    async fn find_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, name
            FROM access_principals
            WHERE id = $1
            "#,
        )
        .bind(principal_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Principal::from))
        .map_err(|error| AppError::Internal(format!("failed to find principal: {error}")))
    }

    async fn find_principal_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, name
            FROM access_principals
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Principal::from))
        .map_err(|error| AppError::Internal(format!("failed to find principal: {error}")))
    }

    async fn delete_principal(&self, principal_id: PrincipalId) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM access_role_user
            WHERE user_id = $1
            "#,
        )
        .bind(principal_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete principal roles: {error}"))
        })?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM access_principals
            WHERE id = $1
            "#,
        )
        .bind(principal_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete principal: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' was not found"
            )));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}

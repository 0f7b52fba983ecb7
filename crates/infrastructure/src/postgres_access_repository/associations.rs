use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use warden_application::{AccessAssociationRepository, AssociationChanges, Relation};

use super::*;

#[async_trait]
impl AccessAssociationRepository for PostgresAccessRepository {
    async fn attach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        insert_links(&self.pool, association, owner_id, target_ids).await
    }

    async fn detach(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: Option<&[i64]>,
    ) -> AppResult<Vec<i64>> {
        let filter = target_ids.map_or(LinkFilter::All, LinkFilter::Only);
        delete_links(&self.pool, association, owner_id, filter).await
    }

    async fn sync(
        &self,
        association: Association,
        owner_id: i64,
        target_ids: &[i64],
        detaching: bool,
    ) -> AppResult<AssociationChanges> {
        let mut transaction = self.begin().await?;

        let detached = if detaching {
            delete_links(
                &mut *transaction,
                association,
                owner_id,
                LinkFilter::Except(target_ids),
            )
            .await?
        } else {
            Vec::new()
        };
        let attached = insert_links(&mut *transaction, association, owner_id, target_ids).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        debug!(
            association = association.as_str(),
            owner_id,
            attached = attached.len(),
            detached = detached.len(),
            "synced links"
        );
        Ok(AssociationChanges { attached, detached })
    }

    async fn count_held(
        &self,
        relation: Relation,
        owner_id: i64,
        target_ids: &BTreeSet<i64>,
    ) -> AppResult<usize> {
        let statement = match relation {
            Relation::PrincipalRole => {
                r#"
                SELECT COUNT(DISTINCT role_id)
                FROM access_role_user
                WHERE user_id = $1 AND role_id = ANY($2)
                "#
            }
            Relation::RolePermission => {
                r#"
                SELECT COUNT(DISTINCT permission_id)
                FROM access_permission_role
                WHERE role_id = $1 AND permission_id = ANY($2)
                "#
            }
            Relation::PrincipalPermission => {
                r#"
                SELECT COUNT(DISTINCT grants.permission_id)
                FROM access_role_user AS memberships
                INNER JOIN access_permission_role AS grants
                    ON grants.role_id = memberships.role_id
                WHERE memberships.user_id = $1 AND grants.permission_id = ANY($2)
                "#
            }
        };

        let count = sqlx::query_scalar::<_, i64>(statement)
            .bind(owner_id)
            .bind(target_ids.iter().copied().collect::<Vec<_>>())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to count {} links: {error}",
                    relation.as_str()
                ))
            })?;

        usize::try_from(count).map_err(|error| {
            AppError::Internal(format!("invalid membership count {count}: {error}"))
        })
    }

    async fn list_principal_roles(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT
                memberships.user_id,
                roles.id,
                roles.name,
                roles.fullname,
                roles.description,
                memberships.created_at,
                memberships.updated_at
            FROM access_role_user AS memberships
            INNER JOIN access_roles AS roles
                ON roles.id = memberships.role_id
            WHERE memberships.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(principal_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list principal roles: {error}")))?;

        rows.into_iter()
            .map(RoleAssignmentRow::into_assignment)
            .collect()
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, AccessItemRow>(
            r#"
            SELECT
                permissions.id,
                permissions.name,
                permissions.fullname,
                permissions.description
            FROM access_permission_role AS grants
            INNER JOIN access_permissions AS permissions
                ON permissions.id = grants.permission_id
            WHERE grants.role_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        rows.into_iter()
            .map(AccessItemRow::into_permission)
            .collect()
    }

    async fn list_principal_permissions(
        &self,
        principal_id: PrincipalId,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, AccessItemRow>(
            r#"
            SELECT DISTINCT
                permissions.id,
                permissions.name,
                permissions.fullname,
                permissions.description
            FROM access_role_user AS memberships
            INNER JOIN access_permission_role AS grants
                ON grants.role_id = memberships.role_id
            INNER JOIN access_permissions AS permissions
                ON permissions.id = grants.permission_id
            WHERE memberships.user_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(principal_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list principal permissions: {error}"))
        })?;

        rows.into_iter()
            .map(AccessItemRow::into_permission)
            .collect()
    }
}

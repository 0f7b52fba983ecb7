use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Transaction};

use warden_application::{Association, RoleAssignment};
use warden_core::{AppError, AppResult, PrincipalId};
use warden_domain::{
    AccessCollection, AccessName, Permission, PermissionId, Principal, Role, RoleId,
};

mod associations;
mod catalog;


/// PostgreSQL-backed repository for roles, permissions and their links.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct AccessItemRow {
    id: i64,
    name: String,
    fullname: Option<String>,
    description: Option<String>,
}

impl AccessItemRow {
    fn into_role(self) -> AppResult<Role> {
        Ok(Role::new(
            RoleId::new(self.id),
            AccessName::new(self.name)?,
            self.fullname,
            self.description,
        ))
    }

    fn into_permission(self) -> AppResult<Permission> {
        Ok(Permission::new(
            PermissionId::new(self.id),
            AccessName::new(self.name)?,
            self.fullname,
            self.description,
        ))
    }
}

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: i64,
    name: String,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        Principal::new(PrincipalId::new(row.id), row.name)
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    user_id: i64,
    id: i64,
    name: String,
    fullname: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleAssignmentRow {
    fn into_assignment(self) -> AppResult<RoleAssignment> {
        let role = AccessItemRow {
            id: self.id,
            name: self.name,
            fullname: self.fullname,
            description: self.description,
        }
        .into_role()?;

        Ok(RoleAssignment {
            principal_id: PrincipalId::new(self.user_id),
            role,
            assigned_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn table_for(collection: AccessCollection) -> &'static str {
    match collection {
        AccessCollection::Roles => "access_roles",
        AccessCollection::Permissions => "access_permissions",
    }
}

/// Pivot table layout for one association.
#[derive(Debug, Clone, Copy)]
struct Pivot {
    table: &'static str,
    owner: &'static str,
    target: &'static str,
}

fn pivot_for(association: Association) -> Pivot {
    match association {
        Association::PrincipalRoles => Pivot {
            table: "access_role_user",
            owner: "user_id",
            target: "role_id",
        },
        Association::RolePermissions => Pivot {
            table: "access_permission_role",
            owner: "role_id",
            target: "permission_id",
        },
    }
}

/// Which of the owner's links a delete touches.
#[derive(Debug, Clone, Copy)]
enum LinkFilter<'a> {
    All,
    Only(&'a [i64]),
    Except(&'a [i64]),
}

async fn insert_links<'e>(
    executor: impl PgExecutor<'e>,
    association: Association,
    owner_id: i64,
    target_ids: &[i64],
) -> AppResult<Vec<i64>> {
    let pivot = pivot_for(association);
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("INSERT INTO ");
    builder.push(pivot.table);
    builder.push(" (");
    builder.push(pivot.owner);
    builder.push(", ");
    builder.push(pivot.target);
    builder.push(") SELECT ");
    builder.push_bind(owner_id);
    builder.push(", target_id FROM UNNEST(");
    builder.push_bind(target_ids.to_vec());
    builder.push("::BIGINT[]) AS target_id ON CONFLICT DO NOTHING RETURNING ");
    builder.push(pivot.target);

    builder
        .build_query_scalar::<i64>()
        .fetch_all(executor)
        .await
        .map_err(|error| map_link_error(error, association))
}

async fn delete_links<'e>(
    executor: impl PgExecutor<'e>,
    association: Association,
    owner_id: i64,
    filter: LinkFilter<'_>,
) -> AppResult<Vec<i64>> {
    let pivot = pivot_for(association);
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("DELETE FROM ");
    builder.push(pivot.table);
    builder.push(" WHERE ");
    builder.push(pivot.owner);
    builder.push(" = ");
    builder.push_bind(owner_id);

    match filter {
        LinkFilter::All => {}
        LinkFilter::Only(ids) => {
            builder.push(" AND ");
            builder.push(pivot.target);
            builder.push(" = ANY(");
            builder.push_bind(ids.to_vec());
            builder.push(")");
        }
        LinkFilter::Except(ids) => {
            builder.push(" AND NOT (");
            builder.push(pivot.target);
            builder.push(" = ANY(");
            builder.push_bind(ids.to_vec());
            builder.push("))");
        }
    }

    builder.push(" RETURNING ");
    builder.push(pivot.target);

    builder
        .build_query_scalar::<i64>()
        .fetch_all(executor)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to detach {} links: {error}",
                association.as_str()
            ))
        })
}

fn map_unique_violation(error: sqlx::Error, label: &str, name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("{label} '{name}' already exists"));
    }

    AppError::Internal(format!("failed to create {label}: {error}"))
}

fn map_link_error(error: sqlx::Error, association: Association) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!(
            "{} link references a missing record",
            association.as_str()
        ));
    }

    AppError::Internal(format!(
        "failed to attach {} links: {error}",
        association.as_str()
    ))
}

use std::sync::Arc;

use tracing::{debug, warn};

use warden_core::AppResult;
use warden_domain::{
    AccessCheckSpec, AccessEntity, AccessGuard, AccessReferences, AccessSubject, GuardKind,
    LookupColumn, MatchMode, Permission, Role,
};

use crate::{
    AccessAssociationRepository, AccessCatalogRepository, MembershipEvaluator, ReferenceResolver,
    Relation,
};

#[cfg(test)]
mod tests;

/// Advisory role and permission checks.
///
/// Checks never fail: guests, subjects that cannot hold the checked kind,
/// unknown names and store errors all evaluate to `false`.
#[derive(Clone)]
pub struct AccessService {
    resolver: ReferenceResolver,
    evaluator: MembershipEvaluator,
}

impl AccessService {
    /// Creates the service from repository implementations.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn AccessCatalogRepository>,
        associations: Arc<dyn AccessAssociationRepository>,
    ) -> Self {
        Self {
            resolver: ReferenceResolver::new(catalog),
            evaluator: MembershipEvaluator::new(associations),
        }
    }

    /// Returns whether the subject holds the roles.
    pub async fn has_roles(
        &self,
        subject: AccessSubject,
        roles: &AccessReferences<Role>,
        mode: MatchMode,
        column: LookupColumn,
    ) -> bool {
        let AccessSubject::Principal(principal_id) = subject else {
            debug!(?subject, "role check denied for subject without roles");
            return false;
        };

        self.check(
            Relation::PrincipalRole,
            principal_id.as_i64(),
            roles,
            mode,
            column,
        )
        .await
    }

    /// Returns whether the subject holds the permissions.
    ///
    /// Principals are checked through all of their roles; a role subject is
    /// checked against its own permissions.
    pub async fn has_permissions(
        &self,
        subject: AccessSubject,
        permissions: &AccessReferences<Permission>,
        mode: MatchMode,
        column: LookupColumn,
    ) -> bool {
        let (relation, owner_id) = match subject {
            AccessSubject::Guest => {
                debug!("permission check denied for guest");
                return false;
            }
            AccessSubject::Principal(principal_id) => {
                (Relation::PrincipalPermission, principal_id.as_i64())
            }
            AccessSubject::Role(role_id) => (Relation::RolePermission, role_id.as_i64()),
        };

        self.check(relation, owner_id, permissions, mode, column)
            .await
    }

    /// Evaluates a role check written in view-conditional form.
    pub async fn has_roles_spec(
        &self,
        subject: AccessSubject,
        spec: &AccessCheckSpec<Role>,
    ) -> bool {
        self.has_roles(subject, spec.references(), spec.mode(), spec.column())
            .await
    }

    /// Evaluates a permission check written in view-conditional form.
    pub async fn has_permissions_spec(
        &self,
        subject: AccessSubject,
        spec: &AccessCheckSpec<Permission>,
    ) -> bool {
        self.has_permissions(subject, spec.references(), spec.mode(), spec.column())
            .await
    }

    /// Returns whether the subject passes a route guard.
    pub async fn passes_guard(&self, subject: AccessSubject, guard: &AccessGuard) -> bool {
        match guard.kind() {
            GuardKind::Role => {
                self.has_roles(subject, &guard.role_references(), guard.mode(), guard.column())
                    .await
            }
            GuardKind::Permission => {
                self.has_permissions(
                    subject,
                    &guard.permission_references(),
                    guard.mode(),
                    guard.column(),
                )
                .await
            }
        }
    }

    async fn check<E: AccessEntity>(
        &self,
        relation: Relation,
        owner_id: i64,
        references: &AccessReferences<E>,
        mode: MatchMode,
        column: LookupColumn,
    ) -> bool {
        match self
            .evaluate(relation, owner_id, references, mode, column)
            .await
        {
            Ok(granted) => {
                debug!(
                    relation = relation.as_str(),
                    owner_id,
                    mode = mode.as_str(),
                    granted,
                    "evaluated access check"
                );
                granted
            }
            Err(error) => {
                warn!(
                    relation = relation.as_str(),
                    owner_id,
                    %error,
                    "access check failed, denying"
                );
                false
            }
        }
    }

    async fn evaluate<E: AccessEntity>(
        &self,
        relation: Relation,
        owner_id: i64,
        references: &AccessReferences<E>,
        mode: MatchMode,
        column: LookupColumn,
    ) -> AppResult<bool> {
        let resolution = self.resolver.resolve_lenient(references, column).await?;
        self.evaluator
            .has_membership(relation, owner_id, &resolution, mode)
            .await
    }
}

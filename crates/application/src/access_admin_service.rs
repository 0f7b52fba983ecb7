use std::sync::Arc;

use tracing::info;

use warden_core::{AppError, AppResult, NonEmptyString, PrincipalId};
use warden_domain::{
    AccessCollection, AccessEntity, AccessReferences, LookupColumn, Permission, PermissionId,
    Principal, Role, RoleId,
};

use crate::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, Association,
    AssociationChanges, ReferenceResolver, RoleAssignment,
};

mod associations;
mod catalog;


/// Catalog administration and relationship mutations.
#[derive(Clone)]
pub struct AccessAdminService {
    catalog: Arc<dyn AccessCatalogRepository>,
    associations: Arc<dyn AccessAssociationRepository>,
    resolver: ReferenceResolver,
}

impl AccessAdminService {
    /// Creates a new service from repository implementations.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn AccessCatalogRepository>,
        associations: Arc<dyn AccessAssociationRepository>,
    ) -> Self {
        Self {
            resolver: ReferenceResolver::new(catalog.clone()),
            catalog,
            associations,
        }
    }
}

use std::sync::Arc;

use warden_application::{
    AccessAdminService, AccessAssociationRepository, AccessCatalogRepository, AccessService,
};
use warden_domain::AccessGuard;

use crate::state::AppState;

/// Wires both access services to a repository implementing the catalog and association ports.
pub fn build_app_state<R>(
    repository: Arc<R>,
    bootstrap_token: String,
    admin_guard: AccessGuard,
) -> AppState
where
    R: AccessCatalogRepository + AccessAssociationRepository + 'static,
{
    let catalog: Arc<dyn AccessCatalogRepository> = repository.clone();
    let associations: Arc<dyn AccessAssociationRepository> = repository;

    AppState {
        access_service: AccessService::new(catalog.clone(), associations.clone()),
        access_admin_service: AccessAdminService::new(catalog, associations),
        bootstrap_token,
        admin_guard,
    }
}

use warden_application::{AccessAdminService, AccessService};
use warden_domain::AccessGuard;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub access_admin_service: AccessAdminService,
    pub bootstrap_token: String,
    pub admin_guard: AccessGuard,
}

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tracing::debug;

use warden_core::PrincipalId;
use warden_domain::{AccessCheckSpec, PermissionId, RoleId};

use crate::access_context::AccessContext;
use crate::dto::{
    AccessCheckRequest, AccessCheckResponse, AssociationChangesResponse, AssociationRequest,
    CreateAccessItemRequest, CreatePrincipalRequest, PermissionResponse, PrincipalResponse,
    RoleAssignmentResponse, RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod checks;
mod permissions;
mod principals;
mod roles;

pub use checks::{check_permissions_handler, check_roles_handler};
pub use permissions::{
    create_permission_handler, delete_permission_handler, get_permission_handler,
    list_permissions_handler,
};
pub use principals::{
    attach_principal_roles_handler, delete_principal_handler, detach_principal_roles_handler,
    get_principal_handler, list_principal_permissions_handler, list_principal_roles_handler,
    register_principal_handler, sync_principal_roles_handler,
};
pub use roles::{
    attach_role_permissions_handler, create_role_handler, delete_role_handler,
    detach_role_permissions_handler, get_role_handler, list_role_permissions_handler,
    list_roles_handler, sync_role_permissions_handler,
};

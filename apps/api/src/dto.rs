mod access;
mod auth;
mod common;

pub use access::{
    AccessCheckRequest, AccessCheckResponse, AssociationChangesResponse, AssociationRequest,
    CreateAccessItemRequest, CreatePrincipalRequest, PermissionResponse, PrincipalResponse,
    RoleAssignmentResponse, RoleResponse,
};
pub use auth::{BootstrapRequest, PrincipalIdentityResponse};
pub use common::HealthResponse;

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod conversions;

/// Incoming payload for view-conditional checks.
///
/// `spec` accepts a reference string, a reference array, or
/// `[references, require_all, column]`. Anything else is denied.
#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    #[serde(default)]
    pub spec: Value,
}

/// Result of a view-conditional check.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub granted: bool,
}

/// Incoming payload for role and permission creation.
#[derive(Debug, Deserialize)]
pub struct CreateAccessItemRequest {
    pub name: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for principal registration.
#[derive(Debug, Deserialize)]
pub struct CreatePrincipalRequest {
    pub name: String,
}

/// Incoming payload for attach, detach and sync.
#[derive(Debug, Deserialize)]
pub struct AssociationRequest {
    #[serde(default)]
    pub references: Option<Value>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub detaching: Option<bool>,
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub fullname: Option<String>,
    pub description: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub fullname: Option<String>,
    pub description: Option<String>,
}

/// API representation of a principal.
#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: i64,
    pub name: String,
}

/// API representation of a role held by a principal.
#[derive(Debug, Serialize)]
pub struct RoleAssignmentResponse {
    pub principal_id: i64,
    pub role: RoleResponse,
    pub assigned_at: String,
    pub updated_at: String,
}

/// Ids linked and unlinked by one mutation.
#[derive(Debug, Serialize)]
pub struct AssociationChangesResponse {
    pub attached: Vec<i64>,
    pub detached: Vec<i64>,
}

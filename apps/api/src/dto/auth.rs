use serde::{Deserialize, Serialize};
use warden_core::PrincipalIdentity;

/// Incoming payload for bootstrap login.
#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub principal: String,
    pub token: String,
}

/// API representation of the authenticated principal.
#[derive(Debug, Serialize)]
pub struct PrincipalIdentityResponse {
    pub principal_id: i64,
    pub display_name: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl PrincipalIdentityResponse {
    pub fn from_identity(
        identity: &PrincipalIdentity,
        roles: Vec<String>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            principal_id: identity.principal_id().as_i64(),
            display_name: identity.display_name().to_owned(),
            roles,
            permissions,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::PrincipalId;

/// Principal information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalIdentity {
    principal_id: PrincipalId,
    display_name: String,
}

impl PrincipalIdentity {
    /// Creates an identity for a registered principal.
    #[must_use]
    pub fn new(principal_id: PrincipalId, display_name: impl Into<String>) -> Self {
        Self {
            principal_id,
            display_name: display_name.into(),
        }
    }

    /// Returns the principal identifier.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    /// Returns the display name for the current principal.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}

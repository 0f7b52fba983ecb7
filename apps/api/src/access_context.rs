use warden_core::PrincipalIdentity;
use warden_domain::AccessSubject;

/// Request-scoped caller resolved from the session.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    identity: Option<PrincipalIdentity>,
}

impl AccessContext {
    pub fn new(identity: Option<PrincipalIdentity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> Option<&PrincipalIdentity> {
        self.identity.as_ref()
    }

    pub fn subject(&self) -> AccessSubject {
        AccessSubject::from(self.identity.as_ref().map(PrincipalIdentity::principal_id))
    }
}

#[cfg(test)]
mod tests {
    use warden_core::{PrincipalId, PrincipalIdentity};
    use warden_domain::AccessSubject;

    use super::AccessContext;

    #[test]
    fn missing_identity_is_a_guest() {
        assert_eq!(AccessContext::default().subject(), AccessSubject::Guest);
    }

    #[test]
    fn identity_maps_to_principal_subject() {
        let context = AccessContext::new(Some(PrincipalIdentity::new(PrincipalId::new(7), "root")));

        assert_eq!(
            context.subject(),
            AccessSubject::Principal(PrincipalId::new(7))
        );
    }
}

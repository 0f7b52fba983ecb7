//! Application services and ports.

#![forbid(unsafe_code)]

mod access_admin_service;
mod access_ports;
mod access_service;
mod membership_evaluator;
mod reference_resolver;

#[cfg(test)]
mod test_fakes;

pub use access_admin_service::AccessAdminService;
pub use access_ports::{
    AccessAssociationRepository, AccessCatalogRepository, AccessItemInput, Association,
    AssociationChanges, Relation, RoleAssignment,
};
pub use access_service::AccessService;
pub use membership_evaluator::MembershipEvaluator;
pub use reference_resolver::{ReferenceResolver, Resolution};

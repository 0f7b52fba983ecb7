//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod guard;
mod membership;
mod reference;
mod subject;

pub use access::{
    ACCESS_NAME_MAX_LENGTH, AccessCollection, AccessEntity, AccessName, Permission, PermissionId,
    Principal, Role, RoleId,
};
pub use guard::{AccessCheckSpec, AccessGuard, GuardKind};
pub use membership::{LookupColumn, MatchMode, MembershipRequirement};
pub use reference::{AccessReference, AccessReferences};
pub use subject::AccessSubject;

use std::sync::Arc;

use warden_core::AppResult;
use warden_domain::{MatchMode, MembershipRequirement};

use crate::{AccessAssociationRepository, Relation, Resolution};

/// Evaluates "any" and "all" membership predicates against stored links.
#[derive(Clone)]
pub struct MembershipEvaluator {
    associations: Arc<dyn AccessAssociationRepository>,
}

impl MembershipEvaluator {
    /// Creates an evaluator backed by the association repository.
    #[must_use]
    pub fn new(associations: Arc<dyn AccessAssociationRepository>) -> Self {
        Self { associations }
    }

    /// Returns whether the owner satisfies the requirement through `relation`.
    pub async fn has_membership(
        &self,
        relation: Relation,
        owner_id: i64,
        resolution: &Resolution,
        mode: MatchMode,
    ) -> AppResult<bool> {
        let targets = resolution.id_set();
        let requirement =
            MembershipRequirement::new(targets.len(), resolution.unresolved().len(), mode);

        if targets.is_empty() {
            return Ok(requirement.is_satisfied_by(0));
        }

        let held_count = self
            .associations
            .count_held(relation, owner_id, &targets)
            .await?;

        Ok(requirement.is_satisfied_by(held_count))
    }
}

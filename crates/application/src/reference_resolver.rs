use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use warden_core::{AppError, AppResult};
use warden_domain::{AccessEntity, AccessReference, AccessReferences, LookupColumn};

use crate::AccessCatalogRepository;

/// Ids resolved from a reference list, plus names that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    ids: Vec<i64>,
    unresolved: Vec<String>,
}

impl Resolution {
    /// Returns resolved ids in first-occurrence order without duplicates.
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Returns resolved ids as a set.
    #[must_use]
    pub fn id_set(&self) -> BTreeSet<i64> {
        self.ids.iter().copied().collect()
    }

    /// Returns distinct names that matched no stored record.
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }
}

/// Normalizes role and permission references into stored ids.
#[derive(Clone)]
pub struct ReferenceResolver {
    catalog: Arc<dyn AccessCatalogRepository>,
}

impl ReferenceResolver {
    /// Creates a resolver backed by the catalog repository.
    #[must_use]
    pub fn new(catalog: Arc<dyn AccessCatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Resolves every reference, failing with `NotFound` on the first unknown name.
    pub async fn resolve<E: AccessEntity>(
        &self,
        references: &AccessReferences<E>,
        column: LookupColumn,
    ) -> AppResult<Vec<i64>> {
        let resolution = self.resolve_lenient(references, column).await?;

        if let Some(name) = resolution.unresolved.first() {
            return Err(AppError::NotFound(format!(
                "{} with {} '{name}' was not found",
                E::COLLECTION.label(),
                column.as_str()
            )));
        }

        Ok(resolution.ids)
    }

    /// Resolves references, collecting unknown names instead of failing.
    pub async fn resolve_lenient<E: AccessEntity>(
        &self,
        references: &AccessReferences<E>,
        column: LookupColumn,
    ) -> AppResult<Resolution> {
        let mut seen = HashSet::new();
        let mut resolution = Resolution::default();

        for reference in references.items() {
            let id = match reference {
                AccessReference::Name(name) => {
                    let found = self
                        .catalog
                        .find_id_by_column(E::COLLECTION, column, name.as_str())
                        .await?;

                    if found.is_none() && !resolution.unresolved.contains(name) {
                        resolution.unresolved.push(name.clone());
                    }

                    found
                }
                other => other.known_id(),
            };

            if let Some(id) = id
                && seen.insert(id)
            {
                resolution.ids.push(id);
            }
        }

        Ok(resolution)
    }
}

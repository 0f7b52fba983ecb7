//! Loosely-shaped role and permission references.

use serde_json::Value;
use warden_core::{AppError, AppResult};

use crate::access::{AccessEntity, Permission, Role};

/// One reference to a role or permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessReference<E> {
    /// Stored numeric identifier.
    Id(i64),
    /// Value matched against a lookup column.
    Name(String),
    /// Already-resolved entity.
    Entity(E),
}

impl<E: AccessEntity> AccessReference<E> {
    /// Returns the identifier when it is known without a lookup.
    #[must_use]
    pub fn known_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Entity(entity) => Some(entity.entity_id()),
            Self::Name(_) => None,
        }
    }
}

/// Ordered list of role or permission references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessReferences<E> {
    items: Vec<AccessReference<E>>,
}

impl<E> AccessReferences<E> {
    /// Creates a reference list from explicit items.
    #[must_use]
    pub fn new(items: Vec<AccessReference<E>>) -> Self {
        Self { items }
    }

    /// Creates an empty reference list.
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Parses a name list delimited by `|` and/or whitespace.
    ///
    /// Empty tokens are discarded, so `"admin||editor "` yields two names.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let items = text
            .split(|character: char| character == '|' || character.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| AccessReference::Name(token.to_owned()))
            .collect();

        Self { items }
    }

    /// Creates a reference list of names, one reference per value.
    #[must_use]
    pub fn names<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: values
                .into_iter()
                .map(|value| AccessReference::Name(value.into()))
                .collect(),
        }
    }

    /// Creates a reference list of numeric identifiers.
    #[must_use]
    pub fn ids<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            items: values.into_iter().map(AccessReference::Id).collect(),
        }
    }

    /// Creates a reference list holding one resolved entity.
    #[must_use]
    pub fn entity(entity: E) -> Self {
        Self {
            items: vec![AccessReference::Entity(entity)],
        }
    }

    /// Parses a transport value into references.
    ///
    /// Accepts an integer id, a delimited name string, an `{"id": n}` object,
    /// or an array of integers, names and id objects. Array string items are
    /// taken as single names.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        match value {
            Value::String(text) => Ok(Self::parse(text)),
            Value::Array(values) => values
                .iter()
                .map(reference_from_json)
                .collect::<AppResult<Vec<_>>>()
                .map(Self::new),
            other => reference_from_json(other).map(|reference| Self::new(vec![reference])),
        }
    }

    /// Returns the references in input order.
    #[must_use]
    pub fn items(&self) -> &[AccessReference<E>] {
        &self.items
    }

    /// Returns whether no references were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<E> Default for AccessReferences<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> FromIterator<AccessReference<E>> for AccessReferences<E> {
    fn from_iter<T: IntoIterator<Item = AccessReference<E>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<E> From<&str> for AccessReferences<E> {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl<E> From<i64> for AccessReferences<E> {
    fn from(value: i64) -> Self {
        Self::ids([value])
    }
}

impl<E> From<&[&str]> for AccessReferences<E> {
    fn from(values: &[&str]) -> Self {
        Self::names(values.iter().copied())
    }
}

impl<E, const N: usize> From<[&str; N]> for AccessReferences<E> {
    fn from(values: [&str; N]) -> Self {
        Self::names(values)
    }
}

impl From<Role> for AccessReferences<Role> {
    fn from(value: Role) -> Self {
        Self::entity(value)
    }
}

impl From<Permission> for AccessReferences<Permission> {
    fn from(value: Permission) -> Self {
        Self::entity(value)
    }
}

fn reference_from_json<E>(value: &Value) -> AppResult<AccessReference<E>> {
    match value {
        Value::Number(number) => number.as_i64().map(AccessReference::Id).ok_or_else(|| {
            AppError::Validation(format!("reference id '{number}' must be an integer"))
        }),
        Value::String(text) if !text.trim().is_empty() => {
            Ok(AccessReference::Name(text.trim().to_owned()))
        }
        Value::Object(object) => object
            .get("id")
            .and_then(Value::as_i64)
            .map(AccessReference::Id)
            .ok_or_else(|| {
                AppError::Validation("reference object must carry an integer 'id'".to_owned())
            }),
        _ => Err(AppError::Validation(
            "reference must be an integer id, a name, an object with an integer 'id', or an array of those"
                .to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AccessReference, AccessReferences};
    use crate::{AccessName, Role, RoleId};

    type RoleReferences = AccessReferences<Role>;

    #[test]
    fn parse_splits_on_pipes_and_whitespace() {
        let references = RoleReferences::parse(" admin|editor \t|| viewer ");
        assert_eq!(
            references,
            RoleReferences::names(["admin", "editor", "viewer"])
        );
    }

    #[test]
    fn delimited_string_matches_name_array() {
        assert_eq!(
            RoleReferences::from("admin|editor"),
            RoleReferences::from(["admin", "editor"])
        );
    }

    #[test]
    fn parse_of_blank_string_is_empty() {
        assert!(RoleReferences::parse(" | ").is_empty());
    }

    #[test]
    fn from_json_accepts_mixed_arrays() {
        let references = RoleReferences::from_json(&json!([1, "editor", {"id": 3}]));
        assert_eq!(
            references.unwrap_or_default().items(),
            &[
                AccessReference::Id(1),
                AccessReference::Name("editor".to_owned()),
                AccessReference::Id(3),
            ]
        );
    }

    #[test]
    fn from_json_does_not_split_array_items() {
        let references = RoleReferences::from_json(&json!(["admin|editor"]));
        assert_eq!(references.unwrap_or_default().len(), 1);
    }

    #[test]
    fn from_json_rejects_unsupported_shapes() {
        for value in [
            json!(null),
            json!(true),
            json!(1.5),
            json!([[1]]),
            json!({"name": "admin"}),
            json!([""]),
        ] {
            assert!(RoleReferences::from_json(&value).is_err(), "{value}");
        }
    }

    #[test]
    fn entity_reference_knows_its_id() {
        let name = AccessName::new("admin").unwrap_or_else(|_| unreachable!());
        let references = RoleReferences::from(Role::new(RoleId::new(4), name, None, None));
        assert_eq!(references.items()[0].known_id(), Some(4));
    }
}

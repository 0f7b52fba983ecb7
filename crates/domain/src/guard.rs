//! Route guard and view-conditional argument parsing.

use std::str::FromStr;

use serde_json::Value;
use warden_core::{AppError, AppResult};

use crate::access::{Permission, Role};
use crate::membership::{LookupColumn, MatchMode};
use crate::reference::AccessReferences;

/// What a route guard checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardKind {
    /// Role membership.
    Role,
    /// Effective permission.
    Permission,
}

impl GuardKind {
    /// Returns a stable value for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Permission => "permission",
        }
    }
}

impl FromStr for GuardKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "role" | "roles" => Ok(Self::Role),
            "permission" | "permissions" => Ok(Self::Permission),
            other => Err(AppError::Validation(format!(
                "guard type must be 'role' or 'permission', got '{other}'"
            ))),
        }
    }
}

/// Route guard definition.
///
/// Written as `type,access[,require_all[,column]]`, for example
/// `role,admin|editor,false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    kind: GuardKind,
    access: String,
    mode: MatchMode,
    column: LookupColumn,
}

impl AccessGuard {
    /// Creates a guard from explicit parts.
    pub fn new(
        kind: GuardKind,
        access: impl Into<String>,
        mode: MatchMode,
        column: LookupColumn,
    ) -> AppResult<Self> {
        let access = access.into();
        if AccessReferences::<Role>::parse(access.as_str()).is_empty() {
            return Err(AppError::Validation(
                "guard access list must name at least one role or permission".to_owned(),
            ));
        }

        Ok(Self {
            kind,
            access,
            mode,
            column,
        })
    }

    /// Parses the comma-separated guard notation.
    pub fn parse(definition: &str) -> AppResult<Self> {
        let mut parts = definition.split(',').map(str::trim);

        let kind = parts
            .next()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("guard type is required".to_owned()))?
            .parse::<GuardKind>()?;
        let access = parts
            .next()
            .ok_or_else(|| AppError::Validation("guard access list is required".to_owned()))?;
        let mode = parts
            .next()
            .map(MatchMode::from_transport)
            .unwrap_or_default();
        let column = parts
            .next()
            .map(LookupColumn::from_str)
            .transpose()?
            .unwrap_or_default();

        if parts.next().is_some() {
            return Err(AppError::Validation(format!(
                "guard '{definition}' has too many parameters"
            )));
        }

        Self::new(kind, access, mode, column)
    }

    /// Returns what the guard checks.
    #[must_use]
    pub fn kind(&self) -> GuardKind {
        self.kind
    }

    /// Returns the raw access list.
    #[must_use]
    pub fn access(&self) -> &str {
        self.access.as_str()
    }

    /// Returns the match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the lookup column.
    #[must_use]
    pub fn column(&self) -> LookupColumn {
        self.column
    }

    /// Returns the access list as role references.
    #[must_use]
    pub fn role_references(&self) -> AccessReferences<Role> {
        AccessReferences::parse(self.access.as_str())
    }

    /// Returns the access list as permission references.
    #[must_use]
    pub fn permission_references(&self) -> AccessReferences<Permission> {
        AccessReferences::parse(self.access.as_str())
    }
}

/// Arguments of a view-conditional check.
///
/// Either a plain reference value, or the array form
/// `[references, require_all, column]` where the second item is a boolean
/// or the string `"true"`/`"false"`, and the third is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCheckSpec<E> {
    references: AccessReferences<E>,
    mode: MatchMode,
    column: LookupColumn,
}

impl<E> AccessCheckSpec<E> {
    /// Creates a check from explicit parts.
    #[must_use]
    pub fn new(references: AccessReferences<E>, mode: MatchMode, column: LookupColumn) -> Self {
        Self {
            references,
            mode,
            column,
        }
    }

    /// Parses the transport form of a check.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        if let Value::Array(items) = value
            && (2..=3).contains(&items.len())
            && let Some(mode) = require_all_flag(&items[1])
        {
            let column = match items.get(2) {
                Some(Value::String(column)) => column.parse::<LookupColumn>()?,
                Some(Value::Null) | None => LookupColumn::default(),
                Some(_) => {
                    return Err(AppError::Validation(
                        "check column must be a string".to_owned(),
                    ));
                }
            };

            return Ok(Self::new(
                AccessReferences::from_json(&items[0])?,
                mode,
                column,
            ));
        }

        Ok(Self::new(
            AccessReferences::from_json(value)?,
            MatchMode::default(),
            LookupColumn::default(),
        ))
    }

    /// Returns the references to check.
    #[must_use]
    pub fn references(&self) -> &AccessReferences<E> {
        &self.references
    }

    /// Returns the match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the lookup column.
    #[must_use]
    pub fn column(&self) -> LookupColumn {
        self.column
    }
}

fn require_all_flag(value: &Value) -> Option<MatchMode> {
    match value {
        Value::Bool(require_all) => Some(MatchMode::from_require_all(*require_all)),
        Value::String(flag) if flag == "true" || flag == "false" => {
            Some(MatchMode::from_transport(flag))
        }
        _ => None,
    }
}

//! Membership predicate modes and evaluation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warden_core::AppError;

/// Whether every listed item must be held or at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every target must be held.
    #[default]
    All,
    /// At least one target must be held.
    Any,
}

impl MatchMode {
    /// Maps a `require_all` flag to a mode.
    #[must_use]
    pub fn from_require_all(require_all: bool) -> Self {
        if require_all { Self::All } else { Self::Any }
    }

    /// Normalizes a transport flag; only the literal `"true"` means all.
    #[must_use]
    pub fn from_transport(value: &str) -> Self {
        Self::from_require_all(value == "true")
    }

    /// Returns whether every target is required.
    #[must_use]
    pub fn require_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns a stable value for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

/// Column used to look up role and permission names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupColumn {
    /// Unique `name` column.
    #[default]
    Name,
    /// Optional `fullname` column.
    Fullname,
}

impl LookupColumn {
    /// Returns the stored column name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Fullname => "fullname",
        }
    }
}

impl FromStr for LookupColumn {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "fullname" => Ok(Self::Fullname),
            _ => Err(AppError::Validation(format!(
                "unknown lookup column '{value}'"
            ))),
        }
    }
}

/// Requirement over a deduplicated target set.
///
/// References that could not be resolved are counted as targets the owner
/// does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipRequirement {
    target_count: usize,
    unresolved_count: usize,
    mode: MatchMode,
}

impl MembershipRequirement {
    /// Creates a requirement for `target_count` distinct resolved ids.
    #[must_use]
    pub fn new(target_count: usize, unresolved_count: usize, mode: MatchMode) -> Self {
        Self {
            target_count,
            unresolved_count,
            mode,
        }
    }

    /// Returns whether holding `held_count` of the targets satisfies the requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, held_count: usize) -> bool {
        match self.mode {
            MatchMode::All => self.unresolved_count == 0 && held_count >= self.target_count,
            MatchMode::Any => held_count > 0,
        }
    }

    /// Returns the number of resolved targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Returns the requirement mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

//! Unit states and check categories.
//!
//! Both enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and are stored as integers in SQL. The integer values are ordered: comparing
//! two variants compares their storage values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// UnitState
// ---------------------------------------------------------------------------

/// Translation state of a unit.
///
/// ```text
/// obsolete (-100) < untranslated (0) < fuzzy (50) < translated (200)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Obsolete,
    Untranslated,
    Fuzzy,
    Translated,
}

impl UnitState {
    /// Lowest state at which a unit is checked when nothing else is configured.
    ///
    /// Everything strictly above `Untranslated` is checkable.
    pub const DEFAULT_CHECKABLE_THRESHOLD: Self = Self::Fuzzy;

    /// Integer value used in SQL storage.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Obsolete => -100,
            Self::Untranslated => 0,
            Self::Fuzzy => 50,
            Self::Translated => 200,
        }
    }

    /// Decode a stored integer.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for values that match no state.
    pub fn from_i64(value: i64) -> Result<Self, CoreError> {
        match value {
            -100 => Ok(Self::Obsolete),
            0 => Ok(Self::Untranslated),
            50 => Ok(Self::Fuzzy),
            200 => Ok(Self::Translated),
            other => Err(CoreError::Validation(format!(
                "unknown unit state value {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obsolete => "obsolete",
            Self::Untranslated => "untranslated",
            Self::Fuzzy => "fuzzy",
            Self::Translated => "translated",
        }
    }

    /// Whether a unit in this state is reconciled under `threshold`.
    #[must_use]
    pub fn is_checkable(self, threshold: Self) -> bool {
        self >= threshold
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obsolete" => Ok(Self::Obsolete),
            "untranslated" => Ok(Self::Untranslated),
            "fuzzy" => Ok(Self::Fuzzy),
            "translated" => Ok(Self::Translated),
            other => Err(CoreError::Validation(format!("unknown unit state '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckCategory
// ---------------------------------------------------------------------------

/// Severity classification of a check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Other,
    Extraction,
    Cosmetic,
    Functional,
    Critical,
}

impl CheckCategory {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Other => 0,
            Self::Extraction => 10,
            Self::Cosmetic => 30,
            Self::Functional => 60,
            Self::Critical => 100,
        }
    }

    /// Decode a stored integer.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for values that match no category.
    pub fn from_i64(value: i64) -> Result<Self, CoreError> {
        match value {
            0 => Ok(Self::Other),
            10 => Ok(Self::Extraction),
            30 => Ok(Self::Cosmetic),
            60 => Ok(Self::Functional),
            100 => Ok(Self::Critical),
            other => Err(CoreError::Validation(format!(
                "unknown check category value {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Extraction => "extraction",
            Self::Cosmetic => "cosmetic",
            Self::Functional => "functional",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

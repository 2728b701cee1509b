//! Persisted check records, live failures, and per-unit check sets.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CheckCategory;
use crate::unit::UnitId;

/// A set of check names (a registry universe or a run's subset).
pub type CheckNames = BTreeSet<String>;

/// Live failures reported by a checker for one unit, keyed by check name.
pub type CheckFailures = BTreeMap<String, CheckFailure>;

/// What a failing check reports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckFailure {
    pub message: String,
    pub category: CheckCategory,
}

/// A currently-failing check as recorded in storage.
///
/// `message` and `category` are copied from the failure that created the row
/// and are never refreshed while the check keeps failing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersistedCheck {
    pub id: i64,
    pub unit_id: UnitId,
    pub name: String,
    pub message: String,
    pub category: CheckCategory,
    /// Set by a reviewer who muted the check.
    pub false_positive: bool,
}

/// A check row to be inserted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCheck {
    pub unit_id: UnitId,
    pub name: String,
    pub message: String,
    pub category: CheckCategory,
}

impl NewCheck {
    #[must_use]
    pub fn from_failure(unit_id: UnitId, name: &str, failure: &CheckFailure) -> Self {
        Self {
            unit_id,
            name: name.to_string(),
            message: failure.message.clone(),
            category: failure.category,
        }
    }
}

/// The persisted checks of one unit, keyed by name.
///
/// Reconciliation consumes the set: every check that is still failing is
/// taken out, and whatever remains afterwards no longer fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSet {
    checks: BTreeMap<String, PersistedCheck>,
}

impl CheckSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a check, replacing any previous entry with the same name.
    pub fn insert(&mut self, check: PersistedCheck) -> Option<PersistedCheck> {
        self.checks.insert(check.name.clone(), check)
    }

    /// Remove and return the entry for `name`, marking it accounted for.
    pub fn take(&mut self, name: &str) -> Option<PersistedCheck> {
        self.checks.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PersistedCheck> {
        self.checks.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Drop every entry whose name is not in `names`.
    pub fn retain_names(&mut self, names: &CheckNames) {
        self.checks.retain(|name, _| names.contains(name));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }

    /// Consume the set, yielding the entries that were never taken.
    pub fn into_remaining(self) -> impl Iterator<Item = PersistedCheck> {
        self.checks.into_values()
    }
}

impl FromIterator<PersistedCheck> for CheckSet {
    fn from_iter<I: IntoIterator<Item = PersistedCheck>>(iter: I) -> Self {
        let mut set = Self::new();
        for check in iter {
            set.insert(check);
        }
        set
    }
}

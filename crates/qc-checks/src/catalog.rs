//! Named suites of built-in rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use qc_core::checks::CheckNames;
use qc_core::enums::CheckCategory;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::rules::ALL_RULES;
use crate::suite::CheckSuite;

/// Suite used when a translation project names none.
pub const DEFAULT_SUITE: &str = "standard";

/// Listing entry for one check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckInfo {
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
}

/// All suites known to this build.
#[derive(Debug, Clone)]
pub struct CheckCatalog {
    suites: BTreeMap<String, Arc<CheckSuite>>,
}

impl Default for CheckCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CheckCatalog {
    /// `standard` runs every rule; `minimal` only critical and functional ones.
    #[must_use]
    pub fn builtin() -> Self {
        let standard = CheckSuite::new("standard", ALL_RULES.to_vec());
        let minimal = CheckSuite::new(
            "minimal",
            ALL_RULES
                .iter()
                .filter(|r| r.category >= CheckCategory::Functional)
                .copied()
                .collect(),
        );
        Self::from_suites([standard, minimal])
    }

    #[must_use]
    pub fn from_suites(suites: impl IntoIterator<Item = CheckSuite>) -> Self {
        Self {
            suites: suites
                .into_iter()
                .map(|s| (s.name().to_string(), Arc::new(s)))
                .collect(),
        }
    }

    /// Look up a suite by name; `None` selects [`DEFAULT_SUITE`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownSuite` if no suite has that name.
    pub fn suite(&self, name: Option<&str>) -> Result<Arc<CheckSuite>, CatalogError> {
        let name = name.unwrap_or(DEFAULT_SUITE);
        self.suites
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownSuite(name.to_string()))
    }

    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    /// Union of the rule names of every suite.
    #[must_use]
    pub fn known_check_names(&self) -> CheckNames {
        self.suites
            .values()
            .flat_map(|s| s.check_names())
            .collect()
    }

    /// Every distinct rule, critical first, then by name.
    #[must_use]
    pub fn describe(&self) -> Vec<CheckInfo> {
        let mut seen: BTreeMap<&str, CheckInfo> = BTreeMap::new();
        for rule in self.suites.values().flat_map(|s| s.rules()) {
            seen.entry(rule.name).or_insert_with(|| CheckInfo {
                name: rule.name.to_string(),
                category: rule.category,
                description: rule.description.to_string(),
            });
        }
        let mut infos: Vec<CheckInfo> = seen.into_values().collect();
        infos.sort_by(|a, b| b.category.cmp(&a.category).then_with(|| a.name.cmp(&b.name)));
        infos
    }
}

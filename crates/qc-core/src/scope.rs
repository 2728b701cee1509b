//! Run scoping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::unit::{ProjectId, StoreId, TranslatableUnit, UnitId};

/// Most ids a store or unit restriction, or a page of units, may carry.
///
/// Each id is bound as its own SQL variable; SQLite allows at most 32766 per
/// statement, and two full id lists plus the project must fit.
pub const MAX_SCOPE_IDS: u32 = 10_000;

/// Restricts a run to a subset of units.
///
/// Every restriction that is set must match; an empty `Scope` covers all units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub translation_project: Option<ProjectId>,
    pub stores: Option<BTreeSet<StoreId>>,
    pub units: Option<BTreeSet<UnitId>>,
}

impl Scope {
    /// Scope covering every unit.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_project(translation_project: ProjectId) -> Self {
        Self {
            translation_project: Some(translation_project),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stores(mut self, stores: impl IntoIterator<Item = StoreId>) -> Self {
        self.stores = Some(stores.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: impl IntoIterator<Item = UnitId>) -> Self {
        self.units = Some(units.into_iter().collect());
        self
    }

    /// Whether no restriction is set.
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.translation_project.is_none() && self.stores.is_none() && self.units.is_none()
    }

    /// Whether any id restriction lists more than [`MAX_SCOPE_IDS`] ids.
    #[must_use]
    pub fn exceeds_id_limit(&self) -> bool {
        let limit = MAX_SCOPE_IDS as usize;
        self.stores.as_ref().is_some_and(|s| s.len() > limit)
            || self.units.as_ref().is_some_and(|u| u.len() > limit)
    }

    /// Whether `unit` falls inside this scope.
    #[must_use]
    pub fn contains(&self, unit: &TranslatableUnit) -> bool {
        self.translation_project
            .is_none_or(|tp| tp == unit.translation_project_id)
            && self
                .stores
                .as_ref()
                .is_none_or(|stores| stores.contains(&unit.store_id))
            && self
                .units
                .as_ref()
                .is_none_or(|units| units.contains(&unit.id))
    }
}

//! Collaborator seams.
//!
//! The engine owns none of these: check rules come from a registry, units and
//! check rows from storage, and statistics caches from whoever aggregates them.
//! Futures returned here are awaited one at a time by a single coordinator.

#![allow(async_fn_in_trait)]

use std::collections::HashMap;
use std::sync::Arc;

use qc_core::checks::{CheckFailures, CheckNames, CheckSet, NewCheck};
use qc_core::enums::UnitState;
use qc_core::scope::Scope;
use qc_core::unit::{ProjectId, StoreId, TranslatableUnit, UnitCursor, UnitId};

use crate::error::EngineError;

/// A bundle of checks applicable to one context.
pub trait Checker: Send + Sync {
    /// Evaluate `unit`, returning every failing check by name.
    ///
    /// With `subset`, only the named checks run. Must not have side effects.
    fn run(&self, unit: &TranslatableUnit, subset: Option<&CheckNames>) -> CheckFailures;
}

/// Source of checkers and of the universe of valid check names.
pub trait CheckerRegistry {
    /// Every check name any checker can currently report.
    fn known_check_names(&self) -> CheckNames;

    /// Checker for a translation project, or `None` if the project is missing.
    async fn checker_for(
        &self,
        translation_project_id: ProjectId,
    ) -> Result<Option<Arc<dyn Checker>>, EngineError>;
}

/// Rows removed by a below-threshold purge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub removed: u64,
    /// Distinct `(translation_project_id, store_id)` pairs that lost rows.
    pub stores: Vec<(ProjectId, StoreId)>,
}

/// Persisted check rows.
pub trait CheckStore {
    /// Load the checks of every unit in `scope`, grouped by unit.
    ///
    /// With `check_names`, rows for other names are left out.
    async fn load_grouped_by_unit(
        &self,
        scope: &Scope,
        check_names: Option<&CheckNames>,
    ) -> Result<HashMap<UnitId, CheckSet>, EngineError>;

    async fn bulk_create(&self, checks: &[NewCheck]) -> Result<u64, EngineError>;

    /// Delete rows by check id.
    async fn bulk_delete(&self, check_ids: &[i64]) -> Result<u64, EngineError>;

    /// Clear `false_positive` on rows by check id.
    async fn bulk_unmute(&self, check_ids: &[i64]) -> Result<u64, EngineError>;

    /// Delete every row whose name is not in `known`.
    async fn delete_unknown(&self, known: &CheckNames) -> Result<u64, EngineError>;

    /// Delete every row in `scope` whose unit state is below `threshold`.
    async fn delete_below_threshold(
        &self,
        scope: &Scope,
        threshold: UnitState,
    ) -> Result<PurgeOutcome, EngineError>;
}

/// Stream of checkable units.
pub trait UnitSource {
    /// Next page of units in `scope` whose state is at least `threshold`.
    ///
    /// Units must come strictly ordered by `(store_id, index, id)` and start
    /// after `after` when given. A page shorter than `limit` ends the stream.
    /// The coordinator rejects pages that break the order.
    async fn checkable_units(
        &self,
        scope: &Scope,
        threshold: UnitState,
        after: Option<UnitCursor>,
        limit: u32,
    ) -> Result<Vec<TranslatableUnit>, EngineError>;

    /// Bump the modification timestamp of the given units.
    async fn touch(&self, unit_ids: &[UnitId]) -> Result<(), EngineError>;
}

/// Evicts a store's derived statistics.
pub trait CacheInvalidator {
    async fn invalidate(&self, store_id: StoreId) -> Result<(), EngineError>;
}

//! `QcService` as the engine's storage, unit source, and cache invalidator.

use std::collections::HashMap;

use qc_core::checks::{CheckNames, CheckSet, NewCheck};
use qc_core::enums::UnitState;
use qc_core::scope::Scope;
use qc_core::unit::{StoreId, TranslatableUnit, UnitCursor, UnitId};
use qc_engine::{CacheInvalidator, CheckStore, EngineError, PurgeOutcome, UnitSource};

use crate::error::storage;
use crate::service::QcService;

impl CheckStore for QcService {
    async fn load_grouped_by_unit(
        &self,
        scope: &Scope,
        check_names: Option<&CheckNames>,
    ) -> Result<HashMap<UnitId, CheckSet>, EngineError> {
        self.load_checks_grouped(scope, check_names)
            .await
            .map_err(storage("load_grouped_by_unit"))
    }

    async fn bulk_create(&self, checks: &[NewCheck]) -> Result<u64, EngineError> {
        self.create_checks(checks)
            .await
            .map_err(storage("bulk_create"))
    }

    async fn bulk_delete(&self, check_ids: &[i64]) -> Result<u64, EngineError> {
        self.delete_checks(check_ids)
            .await
            .map_err(storage("bulk_delete"))
    }

    async fn bulk_unmute(&self, check_ids: &[i64]) -> Result<u64, EngineError> {
        self.unmute_checks(check_ids)
            .await
            .map_err(storage("bulk_unmute"))
    }

    async fn delete_unknown(&self, known: &CheckNames) -> Result<u64, EngineError> {
        self.delete_unknown_checks(known)
            .await
            .map_err(storage("delete_unknown"))
    }

    async fn delete_below_threshold(
        &self,
        scope: &Scope,
        threshold: UnitState,
    ) -> Result<PurgeOutcome, EngineError> {
        self.delete_checks_below_threshold(scope, threshold)
            .await
            .map_err(storage("delete_below_threshold"))
    }
}

impl UnitSource for QcService {
    async fn checkable_units(
        &self,
        scope: &Scope,
        threshold: UnitState,
        after: Option<UnitCursor>,
        limit: u32,
    ) -> Result<Vec<TranslatableUnit>, EngineError> {
        self.checkable_units_page(scope, threshold, after, limit)
            .await
            .map_err(storage("checkable_units"))
    }

    async fn touch(&self, unit_ids: &[UnitId]) -> Result<(), EngineError> {
        self.touch_units(unit_ids)
            .await
            .map(|_| ())
            .map_err(storage("touch"))
    }
}

impl CacheInvalidator for QcService {
    async fn invalidate(&self, store_id: StoreId) -> Result<(), EngineError> {
        self.invalidate_store_stats(store_id)
            .await
            .map(|_| ())
            .map_err(storage("invalidate"))
    }
}

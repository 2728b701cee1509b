//! Response types returned by the engine and printed as JSON by `qc` commands.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::checks::PersistedCheck;
use crate::unit::{ProjectId, StoreId, UnitId};

/// Outcome of one reconciliation run (`qc update-checks`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows removed because their check name is no longer known.
    pub unknown_purged: u64,
    /// Rows removed because their unit is below the checkable threshold.
    pub below_threshold_purged: u64,
    /// Checkable units visited by the reconciliation pass.
    pub units_processed: u64,
    /// Units whose persisted checks changed.
    pub units_updated: u64,
    /// Units skipped because no checker could be resolved.
    pub units_skipped: u64,
    pub checks_created: u64,
    pub checks_deleted: u64,
    pub checks_unmuted: u64,
    /// Number of cache invalidation calls issued.
    pub stores_invalidated: u64,
    /// Stores whose checks changed, grouped by translation project.
    pub updated_stores: BTreeMap<ProjectId, BTreeSet<StoreId>>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Record that `store_id` (in `translation_project_id`) had check changes.
    pub fn record_updated_store(&mut self, translation_project_id: ProjectId, store_id: StoreId) {
        self.updated_stores
            .entry(translation_project_id)
            .or_default()
            .insert(store_id);
    }
}

/// Response from `qc list-checks`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnitChecksResponse {
    pub unit_id: UnitId,
    pub checks: Vec<PersistedCheck>,
}

/// Aggregate check statistics of one store (`qc stats`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StoreStats {
    pub store_id: StoreId,
    /// Unmuted failing checks.
    pub active_checks: u64,
    /// Unmuted failing checks in the critical category.
    pub critical_checks: u64,
    /// Muted checks.
    pub muted_checks: u64,
    pub computed_at: String,
}

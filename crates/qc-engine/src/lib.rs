//! # qc-engine
//!
//! Keeps persisted quality checks in step with what the check rules report
//! right now, writing as little as possible.
//!
//! - [`reconciler`]: the per-unit diff (create / delete / unmute).
//! - [`resolver`]: per-run memoized translation project → checker lookup.
//! - [`invalidation`]: store-transition debouncing of cache evictions.
//! - [`coordinator`]: a full run: purges, paged reconciliation pass, flushes.
//!
//! Storage, units, checkers, and caches are reached only through the traits in
//! [`traits`], so the engine runs the same against libSQL or an in-memory fake.

pub mod coordinator;
pub mod error;
pub mod invalidation;
pub mod reconciler;
pub mod resolver;
pub mod traits;

#[cfg(test)]
mod testing;

pub use coordinator::{BatchCoordinator, RunRequest};
pub use error::{EngineError, RunError};
pub use invalidation::InvalidationTracker;
pub use reconciler::{ReconciliationOutcome, UnitPlan, UnitReconciler};
pub use resolver::CheckerResolver;
pub use traits::{CacheInvalidator, CheckStore, Checker, CheckerRegistry, PurgeOutcome, UnitSource};

//! Full reconciliation runs.
//!
//! A run is four steps:
//! 1. purge rows whose check name is no longer known (always, for all units)
//! 2. purge rows of in-scope units below the checkable threshold
//! 3. page through checkable units in `(store_id, index)` order, reconciling
//!    each and marking changed stores for invalidation
//! 4. flush outstanding store invalidations
//!
//! A run that fails or is cancelled after writing still touches the units it
//! changed and flushes their stores, so no changed store keeps a stale cache.

use std::time::Instant;

use qc_core::checks::CheckNames;
use qc_core::enums::UnitState;
use qc_core::responses::RunSummary;
use qc_core::scope::{MAX_SCOPE_IDS, Scope};
use qc_core::unit::{StoreId, TranslatableUnit, UnitCursor, UnitId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EngineError, RunError};
use crate::invalidation::InvalidationTracker;
use crate::reconciler::UnitReconciler;
use crate::resolver::CheckerResolver;
use crate::traits::{CacheInvalidator, CheckStore, CheckerRegistry, UnitSource};

const DEFAULT_PAGE_SIZE: u32 = 1000;

/// What a run should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Restrict evaluation (and the rows touched) to these check names.
    pub check_names: Option<CheckNames>,
    pub scope: Scope,
    /// When `false`, muted checks that still fail get unmuted.
    pub keep_false_positives: bool,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            check_names: None,
            scope: Scope::all(),
            keep_false_positives: true,
        }
    }
}

/// Orchestrates a reconciliation run over the given collaborators.
///
/// Each run owns its checker memo and invalidation slot, so separate
/// coordinators may work on disjoint translation projects side by side.
pub struct BatchCoordinator<'a, R, S, U, C> {
    registry: &'a R,
    store: &'a S,
    units: &'a U,
    invalidator: &'a C,
    threshold: UnitState,
    page_size: u32,
    cancel: CancellationToken,
}

impl<'a, R, S, U, C> BatchCoordinator<'a, R, S, U, C>
where
    R: CheckerRegistry,
    S: CheckStore,
    U: UnitSource,
    C: CacheInvalidator,
{
    #[must_use]
    pub fn new(registry: &'a R, store: &'a S, units: &'a U, invalidator: &'a C) -> Self {
        Self {
            registry,
            store,
            units,
            invalidator,
            threshold: UnitState::DEFAULT_CHECKABLE_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            cancel: CancellationToken::new(),
        }
    }

    /// Lowest unit state that is checked; rows of units below it are purged.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: UnitState) -> Self {
        self.threshold = threshold;
        self
    }

    /// Units fetched per page, clamped to `1..=MAX_SCOPE_IDS`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_SCOPE_IDS);
        self
    }

    /// Token checked between units; cancelling it stops the run.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run all four steps.
    ///
    /// # Errors
    ///
    /// Returns `RunError` carrying the progress made so far when storage fails,
    /// the unit source breaks its ordering, or the run is cancelled. Units
    /// without a checker are skipped, not errors.
    pub async fn run(&self, request: RunRequest) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        let mut run = Run {
            summary: RunSummary::default(),
            tracker: InvalidationTracker::new(),
            resolver: CheckerResolver::new(self.registry),
            untouched: Vec::new(),
        };

        let result = self.execute(&request, &mut run).await;
        if result.is_err() {
            self.salvage(&mut run).await;
        }
        run.summary.elapsed_ms = elapsed_ms(started);

        match result {
            Ok(()) => {
                info!(
                    unknown_purged = run.summary.unknown_purged,
                    below_threshold_purged = run.summary.below_threshold_purged,
                    units_processed = run.summary.units_processed,
                    units_updated = run.summary.units_updated,
                    units_skipped = run.summary.units_skipped,
                    stores_invalidated = run.summary.stores_invalidated,
                    elapsed_ms = run.summary.elapsed_ms,
                    "quality check run finished"
                );
                Ok(run.summary)
            }
            Err(cause) => Err(RunError {
                progress: run.summary,
                cause,
            }),
        }
    }

    async fn execute(&self, request: &RunRequest, run: &mut Run<'a, R>) -> Result<(), EngineError> {
        self.purge_unknown(run).await?;
        self.purge_below_threshold(request, run).await?;
        self.reconcile_checkable(request, run).await?;
        for store_id in run.tracker.finish() {
            self.invalidate(store_id, run).await?;
        }
        Ok(())
    }

    async fn purge_unknown(&self, run: &mut Run<'a, R>) -> Result<(), EngineError> {
        let started = Instant::now();
        let known = self.registry.known_check_names();
        run.summary.unknown_purged = self.store.delete_unknown(&known).await?;
        debug!(
            removed = run.summary.unknown_purged,
            elapsed_ms = elapsed_ms(started),
            "cleared unknown checks"
        );
        Ok(())
    }

    async fn purge_below_threshold(
        &self,
        request: &RunRequest,
        run: &mut Run<'a, R>,
    ) -> Result<(), EngineError> {
        let started = Instant::now();
        let outcome = self
            .store
            .delete_below_threshold(&request.scope, self.threshold)
            .await?;
        run.summary.below_threshold_purged = outcome.removed;
        for (translation_project_id, store_id) in outcome.stores {
            run.summary
                .record_updated_store(translation_project_id, store_id);
            run.tracker.defer(store_id);
        }
        if outcome.removed > 0 {
            debug!(
                removed = outcome.removed,
                threshold = %self.threshold,
                elapsed_ms = elapsed_ms(started),
                "deleted checks for units below threshold"
            );
        }
        Ok(())
    }

    async fn reconcile_checkable(
        &self,
        request: &RunRequest,
        run: &mut Run<'a, R>,
    ) -> Result<(), EngineError> {
        let started = Instant::now();
        let reconciler = UnitReconciler::new(
            self.store,
            request.check_names.as_ref(),
            request.keep_false_positives,
        );

        // A single-project run needs exactly one checker.
        let project_checker = match request.scope.translation_project {
            Some(tp) => Some(run.resolver.resolve(tp).await?),
            None => None,
        };

        let mut after: Option<UnitCursor> = None;
        loop {
            let page = self
                .units
                .checkable_units(&request.scope, self.threshold, after, self.page_size)
                .await?;
            if page.is_empty() {
                break;
            }
            check_order(after, &page)?;
            after = page.last().map(TranslatableUnit::cursor);

            let page_scope = Scope::all().with_units(page.iter().map(|u| u.id));
            let mut grouped = self
                .store
                .load_grouped_by_unit(&page_scope, request.check_names.as_ref())
                .await?;

            for unit in &page {
                if self.cancel.is_cancelled() {
                    return Err(EngineError::Cancelled);
                }
                run.summary.units_processed += 1;

                let checker = match &project_checker {
                    Some(checker) => checker.clone(),
                    None => run.resolver.resolve(unit.translation_project_id).await?,
                };
                let Some(checker) = checker else {
                    warn!(
                        unit_id = unit.id,
                        translation_project_id = unit.translation_project_id,
                        "no checker for unit; skipping"
                    );
                    run.summary.units_skipped += 1;
                    continue;
                };

                let original = grouped.remove(&unit.id).unwrap_or_default();
                let outcome = match reconciler.reconcile(unit, Some(&*checker), original).await {
                    Ok(outcome) => outcome.unwrap_or_default(),
                    Err(err) => {
                        // Some of the unit's writes may have landed.
                        run.tracker.defer(unit.store_id);
                        return Err(err);
                    }
                };
                if !outcome.changed() {
                    continue;
                }

                run.summary.units_updated += 1;
                run.summary.checks_created += outcome.created;
                run.summary.checks_deleted += outcome.deleted;
                run.summary.checks_unmuted += outcome.unmuted;
                run.summary
                    .record_updated_store(unit.translation_project_id, unit.store_id);
                run.untouched.push(unit.id);
                if let Some(store_id) = run.tracker.mark(unit.store_id) {
                    self.invalidate(store_id, run).await?;
                }
            }

            if !run.untouched.is_empty() {
                self.units.touch(&run.untouched).await?;
                run.untouched.clear();
            }
            if page.len() < self.page_size as usize {
                break;
            }
        }

        if run.summary.units_updated > 0 {
            debug!(
                units_updated = run.summary.units_updated,
                elapsed_ms = elapsed_ms(started),
                "updated checks"
            );
        }
        Ok(())
    }

    async fn invalidate(&self, store_id: StoreId, run: &mut Run<'a, R>) -> Result<(), EngineError> {
        self.invalidator.invalidate(store_id).await?;
        run.summary.stores_invalidated += 1;
        debug!(store_id, "invalidated store cache");
        Ok(())
    }

    /// Best-effort cleanup after a failed run: touch changed units not yet
    /// touched and flush every store still owed an invalidation.
    async fn salvage(&self, run: &mut Run<'a, R>) {
        let untouched = std::mem::take(&mut run.untouched);
        if !untouched.is_empty() {
            if let Err(err) = self.units.touch(&untouched).await {
                warn!(%err, units = untouched.len(), "failed to touch changed units");
            }
        }
        for store_id in run.tracker.finish() {
            if let Err(err) = self.invalidate(store_id, run).await {
                warn!(%err, store_id, "failed to invalidate store cache");
            }
        }
    }
}

/// Mutable state of one run.
struct Run<'a, R> {
    summary: RunSummary,
    tracker: InvalidationTracker,
    resolver: CheckerResolver<'a, R>,
    /// Changed units of the current page, touched once the page is done.
    untouched: Vec<UnitId>,
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Verify a page continues strictly after `after` in unit order.
fn check_order(after: Option<UnitCursor>, page: &[TranslatableUnit]) -> Result<(), EngineError> {
    let mut previous = after;
    for unit in page {
        let current = unit.cursor();
        if let Some(previous) = previous.filter(|p| current <= *p) {
            return Err(EngineError::UnorderedUnits { previous, current });
        }
        previous = Some(current);
    }
    Ok(())
}

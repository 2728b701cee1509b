//! Per-unit reconciliation.
//!
//! Diffs the checks a checker reports for a unit right now against the checks
//! persisted for it:
//!
//! | failing now | persisted | action |
//! |-------------|-----------|--------|
//! | yes | no | create with the failure's message and category |
//! | yes | yes, muted, `keep_false_positives == false` | unmute |
//! | yes | yes, otherwise | nothing (message and category stay as created) |
//! | no  | yes | delete |

use qc_core::checks::{CheckFailures, CheckNames, CheckSet, NewCheck, PersistedCheck};
use qc_core::unit::TranslatableUnit;
use tracing::trace;

use crate::error::EngineError;
use crate::traits::{CheckStore, Checker};

/// The writes needed to bring one unit's checks up to date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitPlan {
    pub create: Vec<NewCheck>,
    pub delete: Vec<PersistedCheck>,
    pub unmute: Vec<PersistedCheck>,
}

impl UnitPlan {
    /// Diff `failures` against `original_checks`, consuming the set.
    ///
    /// Both sides must already be restricted to the same check names.
    #[must_use]
    pub fn build(
        unit: &TranslatableUnit,
        failures: &CheckFailures,
        mut original_checks: CheckSet,
        keep_false_positives: bool,
    ) -> Self {
        let mut plan = Self::default();

        for (name, failure) in failures {
            match original_checks.take(name) {
                Some(existing) => {
                    if existing.false_positive && !keep_false_positives {
                        plan.unmute.push(existing);
                    }
                }
                None => plan.create.push(NewCheck::from_failure(unit.id, name, failure)),
            }
        }

        plan.delete.extend(original_checks.into_remaining());
        plan
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty() && self.unmute.is_empty()
    }
}

/// Row counts written for one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    pub created: u64,
    pub deleted: u64,
    pub unmuted: u64,
}

impl ReconciliationOutcome {
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.created > 0 || self.deleted > 0 || self.unmuted > 0
    }
}

/// Applies [`UnitPlan`]s for one run's settings.
pub struct UnitReconciler<'a, S> {
    store: &'a S,
    check_names: Option<&'a CheckNames>,
    keep_false_positives: bool,
}

impl<'a, S: CheckStore> UnitReconciler<'a, S> {
    #[must_use]
    pub const fn new(
        store: &'a S,
        check_names: Option<&'a CheckNames>,
        keep_false_positives: bool,
    ) -> Self {
        Self {
            store,
            check_names,
            keep_false_positives,
        }
    }

    /// Compute the plan for `unit` without writing anything.
    ///
    /// Returns `None` when there is no checker for the unit.
    #[must_use]
    pub fn plan(
        &self,
        unit: &TranslatableUnit,
        checker: Option<&dyn Checker>,
        mut original_checks: CheckSet,
    ) -> Option<UnitPlan> {
        let checker = checker?;
        let mut failures = checker.run(unit, self.check_names);
        if let Some(names) = self.check_names {
            // Rows outside the subset were neither evaluated nor may be touched.
            failures.retain(|name, _| names.contains(name));
            original_checks.retain_names(names);
        }
        Some(UnitPlan::build(
            unit,
            &failures,
            original_checks,
            self.keep_false_positives,
        ))
    }

    /// Reconcile one unit and apply the resulting writes.
    ///
    /// Creates, deletes, and unmutes go out as up to three bulk operations;
    /// empty ones are skipped. Returns `None` when there is no checker for the
    /// unit, in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if a bulk write fails. Writes already
    /// applied for this unit are not rolled back.
    pub async fn reconcile(
        &self,
        unit: &TranslatableUnit,
        checker: Option<&dyn Checker>,
        original_checks: CheckSet,
    ) -> Result<Option<ReconciliationOutcome>, EngineError> {
        let Some(plan) = self.plan(unit, checker, original_checks) else {
            return Ok(None);
        };
        self.apply(plan).await.map(Some)
    }

    async fn apply(&self, plan: UnitPlan) -> Result<ReconciliationOutcome, EngineError> {
        let mut outcome = ReconciliationOutcome::default();

        if !plan.create.is_empty() {
            outcome.created = self.store.bulk_create(&plan.create).await?;
        }
        if !plan.delete.is_empty() {
            let ids: Vec<i64> = plan.delete.iter().map(|c| c.id).collect();
            outcome.deleted = self.store.bulk_delete(&ids).await?;
        }
        if !plan.unmute.is_empty() {
            let ids: Vec<i64> = plan.unmute.iter().map(|c| c.id).collect();
            outcome.unmuted = self.store.bulk_unmute(&ids).await?;
        }

        trace!(
            created = outcome.created,
            deleted = outcome.deleted,
            unmuted = outcome.unmuted,
            "applied unit plan"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryBackend, StaticChecker, failure, persisted, unit};
    use pretty_assertions::assert_eq;
    use qc_core::enums::CheckCategory;

    #[test]
    fn new_failure_is_planned_for_creation() {
        let u = unit(1, 1, 0);
        let failures = [(
            "endpunc".to_string(),
            failure("Ending punctuation", CheckCategory::Cosmetic),
        )]
        .into_iter()
        .collect();
        let plan = UnitPlan::build(&u, &failures, CheckSet::new(), true);
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].name, "endpunc");
        assert_eq!(plan.create[0].message, "Ending punctuation");
        assert!(plan.delete.is_empty());
        assert!(plan.unmute.is_empty());
    }

    #[test]
    fn no_failures_and_no_checks_is_a_noop() {
        let u = unit(1, 1, 0);
        let plan = UnitPlan::build(&u, &CheckFailures::new(), CheckSet::new(), false);
        assert!(plan.is_empty());
    }

    #[test]
    fn still_failing_check_keeps_frozen_message() {
        let u = unit(1, 1, 0);
        let failures = [("numbers".to_string(), failure("new wording", CheckCategory::Critical))]
            .into_iter()
            .collect();
        let original: CheckSet = [persisted(10, 1, "numbers", false)].into_iter().collect();
        let plan = UnitPlan::build(&u, &failures, original, true);
        assert!(plan.is_empty(), "existing failing check must not be rewritten");
    }

    #[test]
    fn passing_check_is_planned_for_deletion() {
        let u = unit(1, 1, 0);
        let original: CheckSet = [persisted(10, 1, "tabs", false)].into_iter().collect();
        let plan = UnitPlan::build(&u, &CheckFailures::new(), original, true);
        assert_eq!(plan.delete.iter().map(|c| c.id).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn muted_failing_check_is_unmuted_only_when_asked() {
        let u = unit(1, 1, 0);
        let failures: CheckFailures = [("x".to_string(), failure("x", CheckCategory::Other))]
            .into_iter()
            .collect();

        let original: CheckSet = [persisted(10, 1, "x", true)].into_iter().collect();
        let keep = UnitPlan::build(&u, &failures, original.clone(), true);
        assert!(keep.is_empty());

        let unmute = UnitPlan::build(&u, &failures, original, false);
        assert_eq!(unmute.unmute.iter().map(|c| c.id).collect::<Vec<_>>(), vec![10]);
        assert!(unmute.create.is_empty());
        assert!(unmute.delete.is_empty());
    }

    #[test]
    fn muted_passing_check_is_deleted() {
        let u = unit(1, 1, 0);
        let original: CheckSet = [persisted(10, 1, "x", true)].into_iter().collect();
        let plan = UnitPlan::build(&u, &CheckFailures::new(), original, true);
        assert_eq!(plan.delete.len(), 1);
    }

    #[test]
    fn check_subset_leaves_other_rows_alone() {
        let backend = MemoryBackend::new();
        let names: CheckNames = ["printf".to_string()].into();
        let reconciler = UnitReconciler::new(&backend, Some(&names), true);
        let checker = StaticChecker::failing(&["printf", "tabs"]);
        let original: CheckSet = [
            persisted(10, 1, "endpunc", false),
            persisted(11, 1, "tabs", false),
        ]
        .into_iter()
        .collect();

        let plan = reconciler
            .plan(&unit(1, 1, 0), Some(&checker), original)
            .expect("checker present");
        assert_eq!(plan.create.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["printf"]);
        assert!(plan.delete.is_empty(), "rows outside the subset must survive");
    }

    #[tokio::test]
    async fn missing_checker_writes_nothing() {
        let backend = MemoryBackend::new();
        backend.insert_check(persisted(10, 1, "tabs", false));
        let reconciler = UnitReconciler::new(&backend, None, true);

        let original = backend.check_set(1);
        let outcome = reconciler
            .reconcile(&unit(1, 1, 0), None, original)
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(backend.check_names(1), vec!["tabs".to_string()]);
        assert_eq!(backend.write_calls(), 0);
    }

    #[tokio::test]
    async fn reconcile_applies_three_bulk_operations() {
        let backend = MemoryBackend::new();
        backend.insert_check(persisted(10, 1, "tabs", false));
        backend.insert_check(persisted(11, 1, "x", true));
        let reconciler = UnitReconciler::new(&backend, None, false);
        let checker = StaticChecker::failing(&["x", "printf"]);

        let outcome = reconciler
            .reconcile(&unit(1, 1, 0), Some(&checker), backend.check_set(1))
            .await
            .unwrap()
            .expect("checker present");

        assert_eq!(
            outcome,
            ReconciliationOutcome {
                created: 1,
                deleted: 1,
                unmuted: 1
            }
        );
        assert!(outcome.changed());
        assert_eq!(backend.write_calls(), 3);
        assert_eq!(
            backend.check_names(1),
            vec!["printf".to_string(), "x".to_string()]
        );
        assert!(!backend.is_muted(1, "x"));
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let backend = MemoryBackend::new();
        let reconciler = UnitReconciler::new(&backend, None, true);
        let checker = StaticChecker::failing(&["endpunc"]);
        let u = unit(1, 1, 0);

        let first = reconciler
            .reconcile(&u, Some(&checker), backend.check_set(1))
            .await
            .unwrap()
            .unwrap();
        assert!(first.changed());

        let second = reconciler
            .reconcile(&u, Some(&checker), backend.check_set(1))
            .await
            .unwrap()
            .unwrap();
        assert!(!second.changed());
        assert_eq!(backend.check_names(1), vec!["endpunc".to_string()]);
    }
}

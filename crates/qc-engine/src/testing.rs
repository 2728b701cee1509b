//! In-memory collaborators for engine tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use qc_core::checks::{CheckFailure, CheckFailures, CheckNames, CheckSet, NewCheck, PersistedCheck};
use qc_core::enums::{CheckCategory, UnitState};
use qc_core::scope::Scope;
use qc_core::unit::{ProjectId, StoreId, TranslatableUnit, UnitCursor, UnitId};
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::traits::{
    CacheInvalidator, CheckStore, Checker, CheckerRegistry, PurgeOutcome, UnitSource,
};

pub fn unit(id: UnitId, store_id: StoreId, index: i64) -> TranslatableUnit {
    TranslatableUnit {
        id,
        store_id,
        index,
        translation_project_id: 1,
        language_code: "fr".into(),
        state: UnitState::Translated,
        source: vec!["Save file.".into()],
        target: vec!["Enregistrer le fichier.".into()],
        locations: Vec::new(),
    }
}

pub fn failure(message: &str, category: CheckCategory) -> CheckFailure {
    CheckFailure {
        message: message.into(),
        category,
    }
}

pub fn persisted(id: i64, unit_id: UnitId, name: &str, false_positive: bool) -> PersistedCheck {
    PersistedCheck {
        id,
        unit_id,
        name: name.into(),
        message: format!("{name} (stored)"),
        category: CheckCategory::Cosmetic,
        false_positive,
    }
}

type FailingNames = dyn Fn(&TranslatableUnit) -> Vec<String> + Send + Sync;

/// Checker whose failures are a function of the unit.
pub struct StaticChecker {
    failing: Box<FailingNames>,
}

impl StaticChecker {
    /// Fails `names` on every unit.
    pub fn failing(names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        Self {
            failing: Box::new(move |_| names.clone()),
        }
    }

    /// Fails the names listed for each unit id, nothing for other units.
    pub fn per_unit(map: &[(UnitId, &[&str])]) -> Self {
        let map: HashMap<UnitId, Vec<String>> = map
            .iter()
            .map(|(id, names)| (*id, names.iter().map(ToString::to_string).collect()))
            .collect();
        Self {
            failing: Box::new(move |unit| map.get(&unit.id).cloned().unwrap_or_default()),
        }
    }
}

impl Checker for StaticChecker {
    fn run(&self, unit: &TranslatableUnit, subset: Option<&CheckNames>) -> CheckFailures {
        (self.failing)(unit)
            .into_iter()
            .filter(|name| subset.is_none_or(|s| s.contains(name)))
            .map(|name| {
                let f = failure(&format!("{name} failed"), CheckCategory::Functional);
                (name, f)
            })
            .collect()
    }
}

/// Wraps a checker and cancels `token` once it has checked `unit_id`.
pub struct CancellingChecker {
    inner: StaticChecker,
    token: CancellationToken,
    unit_id: UnitId,
}

impl CancellingChecker {
    pub const fn new(inner: StaticChecker, token: CancellationToken, unit_id: UnitId) -> Self {
        Self {
            inner,
            token,
            unit_id,
        }
    }
}

impl Checker for CancellingChecker {
    fn run(&self, unit: &TranslatableUnit, subset: Option<&CheckNames>) -> CheckFailures {
        let failures = self.inner.run(unit, subset);
        if unit.id == self.unit_id {
            self.token.cancel();
        }
        failures
    }
}

/// Registry backed by a fixed project → checker map.
pub struct MemoryRegistry {
    known: CheckNames,
    checkers: HashMap<ProjectId, Arc<dyn Checker>>,
    lookups: Cell<u32>,
}

impl MemoryRegistry {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(ToString::to_string).collect(),
            checkers: HashMap::new(),
            lookups: Cell::new(0),
        }
    }

    pub fn with_checker(mut self, tp: ProjectId, checker: impl Checker + 'static) -> Self {
        self.checkers.insert(tp, Arc::new(checker));
        self
    }

    pub fn lookups(&self) -> u32 {
        self.lookups.get()
    }
}

impl CheckerRegistry for MemoryRegistry {
    fn known_check_names(&self) -> CheckNames {
        self.known.clone()
    }

    async fn checker_for(
        &self,
        translation_project_id: ProjectId,
    ) -> Result<Option<Arc<dyn Checker>>, EngineError> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.checkers.get(&translation_project_id).cloned())
    }
}

#[derive(Default)]
struct State {
    units: Vec<TranslatableUnit>,
    checks: BTreeMap<i64, PersistedCheck>,
    next_id: i64,
    touched: Vec<UnitId>,
    invalidations: Vec<StoreId>,
    write_calls: usize,
    fail_on: Option<&'static str>,
    fail_creates_for: Option<UnitId>,
    unordered: bool,
}

/// Check store, unit source, and cache invalidator over in-memory state.
#[derive(Default)]
pub struct MemoryBackend {
    state: RefCell<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().next_id = 1000;
        backend
    }

    pub fn add_unit(&self, unit: TranslatableUnit) {
        self.state.borrow_mut().units.push(unit);
    }

    pub fn set_state(&self, unit_id: UnitId, state: UnitState) {
        let mut s = self.state.borrow_mut();
        if let Some(u) = s.units.iter_mut().find(|u| u.id == unit_id) {
            u.state = state;
        }
    }

    pub fn insert_check(&self, check: PersistedCheck) {
        self.state.borrow_mut().checks.insert(check.id, check);
    }

    /// Make the named operation fail with a storage error.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.borrow_mut().fail_on = Some(operation);
    }

    /// Make `bulk_create` fail for checks of `unit_id` only.
    pub fn fail_creates_for(&self, unit_id: UnitId) {
        self.state.borrow_mut().fail_creates_for = Some(unit_id);
    }

    /// Serve units in reverse order, breaking the ordering precondition.
    pub fn serve_unordered(&self) {
        self.state.borrow_mut().unordered = true;
    }

    pub fn check_set(&self, unit_id: UnitId) -> CheckSet {
        self.state
            .borrow()
            .checks
            .values()
            .filter(|c| c.unit_id == unit_id)
            .cloned()
            .collect()
    }

    pub fn check_names(&self, unit_id: UnitId) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .borrow()
            .checks
            .values()
            .filter(|c| c.unit_id == unit_id)
            .map(|c| c.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn all_checks(&self) -> Vec<PersistedCheck> {
        self.state.borrow().checks.values().cloned().collect()
    }

    pub fn is_muted(&self, unit_id: UnitId, name: &str) -> bool {
        self.state
            .borrow()
            .checks
            .values()
            .any(|c| c.unit_id == unit_id && c.name == name && c.false_positive)
    }

    pub fn touched(&self) -> Vec<UnitId> {
        self.state.borrow().touched.clone()
    }

    pub fn invalidations(&self) -> Vec<StoreId> {
        self.state.borrow().invalidations.clone()
    }

    pub fn write_calls(&self) -> usize {
        self.state.borrow().write_calls
    }

    fn check_failure(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.state.borrow().fail_on == Some(operation) {
            return Err(EngineError::storage(
                operation,
                anyhow::anyhow!("disk I/O error"),
            ));
        }
        Ok(())
    }

    fn unit_in(&self, unit_id: UnitId, scope: &Scope) -> Option<TranslatableUnit> {
        self.state
            .borrow()
            .units
            .iter()
            .find(|u| u.id == unit_id && scope.contains(u))
            .cloned()
    }
}

impl CheckStore for MemoryBackend {
    async fn load_grouped_by_unit(
        &self,
        scope: &Scope,
        check_names: Option<&CheckNames>,
    ) -> Result<HashMap<UnitId, CheckSet>, EngineError> {
        self.check_failure("load_grouped_by_unit")?;
        let checks: Vec<PersistedCheck> = self.state.borrow().checks.values().cloned().collect();
        let mut grouped: HashMap<UnitId, CheckSet> = HashMap::new();
        for check in checks {
            if check_names.is_some_and(|names| !names.contains(&check.name)) {
                continue;
            }
            if self.unit_in(check.unit_id, scope).is_none() {
                continue;
            }
            grouped.entry(check.unit_id).or_default().insert(check);
        }
        Ok(grouped)
    }

    async fn bulk_create(&self, checks: &[NewCheck]) -> Result<u64, EngineError> {
        self.check_failure("bulk_create")?;
        let mut s = self.state.borrow_mut();
        if let Some(unit_id) = s.fail_creates_for {
            if checks.iter().any(|c| c.unit_id == unit_id) {
                return Err(EngineError::storage(
                    "bulk_create",
                    anyhow::anyhow!("disk I/O error"),
                ));
            }
        }
        s.write_calls += 1;
        for new in checks {
            assert!(
                !s.checks
                    .values()
                    .any(|c| c.unit_id == new.unit_id && c.name == new.name),
                "duplicate check {}/{}",
                new.unit_id,
                new.name
            );
            let id = s.next_id;
            s.next_id += 1;
            s.checks.insert(
                id,
                PersistedCheck {
                    id,
                    unit_id: new.unit_id,
                    name: new.name.clone(),
                    message: new.message.clone(),
                    category: new.category,
                    false_positive: false,
                },
            );
        }
        Ok(checks.len() as u64)
    }

    async fn bulk_delete(&self, check_ids: &[i64]) -> Result<u64, EngineError> {
        self.check_failure("bulk_delete")?;
        let mut s = self.state.borrow_mut();
        s.write_calls += 1;
        let removed = check_ids
            .iter()
            .filter(|id| s.checks.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn bulk_unmute(&self, check_ids: &[i64]) -> Result<u64, EngineError> {
        self.check_failure("bulk_unmute")?;
        let mut s = self.state.borrow_mut();
        s.write_calls += 1;
        let mut unmuted = 0;
        for id in check_ids {
            if let Some(check) = s.checks.get_mut(id) {
                if check.false_positive {
                    check.false_positive = false;
                    unmuted += 1;
                }
            }
        }
        Ok(unmuted)
    }

    async fn delete_unknown(&self, known: &CheckNames) -> Result<u64, EngineError> {
        self.check_failure("delete_unknown")?;
        let mut s = self.state.borrow_mut();
        let before = s.checks.len();
        s.checks.retain(|_, c| known.contains(&c.name));
        Ok((before - s.checks.len()) as u64)
    }

    async fn delete_below_threshold(
        &self,
        scope: &Scope,
        threshold: UnitState,
    ) -> Result<PurgeOutcome, EngineError> {
        self.check_failure("delete_below_threshold")?;
        let mut s = self.state.borrow_mut();
        let below: HashMap<UnitId, (ProjectId, StoreId)> = s
            .units
            .iter()
            .filter(|u| scope.contains(u) && !u.state.is_checkable(threshold))
            .map(|u| (u.id, (u.translation_project_id, u.store_id)))
            .collect();

        let mut outcome = PurgeOutcome::default();
        s.checks.retain(|_, c| match below.get(&c.unit_id) {
            Some(pair) => {
                outcome.removed += 1;
                if !outcome.stores.contains(pair) {
                    outcome.stores.push(*pair);
                }
                false
            }
            None => true,
        });
        Ok(outcome)
    }
}

impl UnitSource for MemoryBackend {
    async fn checkable_units(
        &self,
        scope: &Scope,
        threshold: UnitState,
        after: Option<UnitCursor>,
        limit: u32,
    ) -> Result<Vec<TranslatableUnit>, EngineError> {
        self.check_failure("checkable_units")?;
        let s = self.state.borrow();
        let mut units: Vec<TranslatableUnit> = s
            .units
            .iter()
            .filter(|u| scope.contains(u) && u.state.is_checkable(threshold))
            .filter(|u| after.is_none_or(|a| u.cursor() > a))
            .cloned()
            .collect();
        units.sort_by_key(TranslatableUnit::cursor);
        units.truncate(limit as usize);
        if s.unordered {
            units.reverse();
        }
        Ok(units)
    }

    async fn touch(&self, unit_ids: &[UnitId]) -> Result<(), EngineError> {
        self.check_failure("touch")?;
        self.state.borrow_mut().touched.extend_from_slice(unit_ids);
        Ok(())
    }
}

impl CacheInvalidator for MemoryBackend {
    async fn invalidate(&self, store_id: StoreId) -> Result<(), EngineError> {
        self.check_failure("invalidate")?;
        self.state.borrow_mut().invalidations.push(store_id);
        Ok(())
    }
}

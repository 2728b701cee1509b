//! Per-run checker lookup.

use std::collections::HashMap;
use std::sync::Arc;

use qc_core::unit::ProjectId;
use tracing::error;

use crate::error::EngineError;
use crate::traits::{Checker, CheckerRegistry};

/// Memoizes translation project → checker for the lifetime of one run.
///
/// The memo is unbounded: there are far fewer translation projects than units.
/// Missing projects are memoized as `None`, so each is reported once per run.
pub struct CheckerResolver<'a, R> {
    registry: &'a R,
    memo: HashMap<ProjectId, Option<Arc<dyn Checker>>>,
}

impl<'a, R: CheckerRegistry> CheckerResolver<'a, R> {
    #[must_use]
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            memo: HashMap::new(),
        }
    }

    /// Checker for `translation_project_id`, or `None` if the project is missing.
    ///
    /// # Errors
    ///
    /// Propagates registry lookup failures; these are not memoized.
    pub async fn resolve(
        &mut self,
        translation_project_id: ProjectId,
    ) -> Result<Option<Arc<dyn Checker>>, EngineError> {
        if let Some(cached) = self.memo.get(&translation_project_id) {
            return Ok(cached.clone());
        }

        let checker = self.registry.checker_for(translation_project_id).await?;
        if checker.is_none() {
            let err = EngineError::MissingChecker {
                translation_project_id,
            };
            error!(%err, "missing translation project; its units will be skipped");
        }
        self.memo.insert(translation_project_id, checker.clone());
        Ok(checker)
    }

    /// Number of distinct projects looked up so far.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.memo.len()
    }
}

//! Checker resolution from stored translation projects.

use std::sync::Arc;

use qc_checks::CheckCatalog;
use qc_core::checks::CheckNames;
use qc_core::unit::ProjectId;
use qc_engine::{Checker, CheckerRegistry, EngineError};
use tracing::warn;

use crate::error::storage;
use crate::service::QcService;

/// Maps a translation project's `checker_style` to a catalog suite.
///
/// An unknown style falls back to the default suite.
pub struct CatalogRegistry<'a> {
    svc: &'a QcService,
    catalog: CheckCatalog,
}

impl<'a> CatalogRegistry<'a> {
    #[must_use]
    pub const fn new(svc: &'a QcService, catalog: CheckCatalog) -> Self {
        Self { svc, catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &CheckCatalog {
        &self.catalog
    }
}

impl CheckerRegistry for CatalogRegistry<'_> {
    fn known_check_names(&self) -> CheckNames {
        self.catalog.known_check_names()
    }

    async fn checker_for(
        &self,
        translation_project_id: ProjectId,
    ) -> Result<Option<Arc<dyn Checker>>, EngineError> {
        let Some(tp) = self
            .svc
            .find_translation_project(translation_project_id)
            .await
            .map_err(storage("checker_for"))?
        else {
            return Ok(None);
        };

        let suite = match self.catalog.suite(tp.checker_style.as_deref()) {
            Ok(suite) => suite,
            Err(err) => {
                warn!(%err, translation_project = %tp.code, "falling back to default suite");
                self.catalog
                    .suite(None)
                    .map_err(|e| EngineError::storage("checker_for", e))?
            }
        };
        let checker: Arc<dyn Checker> = suite;
        Ok(Some(checker))
    }
}

//! Engine error types.

use qc_core::responses::RunSummary;
use qc_core::unit::{ProjectId, UnitCursor};
use thiserror::Error;

/// Errors raised while reconciling checks.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A unit references a translation project that does not exist.
    ///
    /// Never returned from a run: the unit is logged and skipped.
    #[error("No checker for translation project {translation_project_id}")]
    MissingChecker { translation_project_id: ProjectId },

    /// A storage read or bulk write failed.
    #[error("Storage failure during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The unit source yielded units out of `(store_id, index)` order.
    #[error("Units out of order: {current:?} follows {previous:?}")]
    UnorderedUnits {
        previous: UnitCursor,
        current: UnitCursor,
    },

    /// The run was cancelled between units.
    #[error("Run cancelled")]
    Cancelled,
}

impl EngineError {
    /// Wrap a storage-layer error raised by `operation`.
    pub fn storage(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }
}

/// A fatal run error together with the progress reached before it.
#[derive(Debug, Error)]
#[error(
    "{cause} (after {} units processed, {} updated)",
    .progress.units_processed,
    .progress.units_updated
)]
pub struct RunError {
    pub progress: RunSummary,
    #[source]
    pub cause: EngineError,
}

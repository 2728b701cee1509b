//! Cross-cutting error types.
//!
//! Domain-specific errors (`DatabaseError`, `EngineError`) are defined in
//! their respective crates. They converge into `anyhow` in `qc-cli`.

use thiserror::Error;

/// Errors that can be raised by any `qc` crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (stored encodings, text payloads).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

//! Reconciliation run defaults.

use qc_core::enums::UnitState;
use qc_core::scope::MAX_SCOPE_IDS;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_true() -> bool {
    true
}

const fn default_threshold() -> UnitState {
    UnitState::DEFAULT_CHECKABLE_THRESHOLD
}

/// Units fetched per page during the reconciliation pass.
const fn default_page_size() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Keep reviewer mutes on checks that still fail.
    #[serde(default = "default_true")]
    pub keep_false_positives: bool,

    /// Lowest unit state that gets checked; units below it keep no checks.
    #[serde(default = "default_threshold")]
    pub checkable_threshold: UnitState,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keep_false_positives: default_true(),
            checkable_threshold: default_threshold(),
            page_size: default_page_size(),
        }
    }
}

impl EngineConfig {
    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `page_size` is zero or above
    /// [`MAX_SCOPE_IDS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.page_size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.page_size > MAX_SCOPE_IDS {
            return Err(ConfigError::InvalidValue {
                field: "engine.page_size".into(),
                reason: format!("must be at most {MAX_SCOPE_IDS}"),
            });
        }
        Ok(())
    }
}

//! Persisted records around units: translation projects and stores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UnitState;
use crate::unit::{ProjectId, StoreId};

/// A language's translation of one project; selects the check suite.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TranslationProject {
    pub id: ProjectId,
    pub code: String,
    pub language_code: String,
    /// Name of the check suite to run; `None` means the default suite.
    pub checker_style: Option<String>,
}

/// A file of units within a translation project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Store {
    pub id: StoreId,
    pub translation_project_id: ProjectId,
    pub path: String,
}

/// Input for inserting a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    pub store_id: StoreId,
    pub index: i64,
    pub state: UnitState,
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub locations: Vec<String>,
}

impl NewUnit {
    /// A singular translated unit.
    #[must_use]
    pub fn translated(store_id: StoreId, index: i64, source: &str, target: &str) -> Self {
        Self {
            store_id,
            index,
            state: UnitState::Translated,
            source: vec![source.to_string()],
            target: vec![target.to_string()],
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: UnitState) -> Self {
        self.state = state;
        self
    }
}

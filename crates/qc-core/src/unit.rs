//! Read-only projection of a translation unit.
//!
//! Whatever backs a unit (a full row, a bare value map, a test fixture), the
//! engine only ever sees a `TranslatableUnit`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UnitState;

pub type UnitId = i64;
pub type StoreId = i64;
pub type ProjectId = i64;

/// The fields of a unit that checks and reconciliation need.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TranslatableUnit {
    pub id: UnitId,
    pub store_id: StoreId,
    /// Position of the unit within its store.
    pub index: i64,
    pub translation_project_id: ProjectId,
    pub language_code: String,
    pub state: UnitState,
    /// Source text; one entry per plural form, a single entry otherwise.
    pub source: Vec<String>,
    /// Target text; one entry per plural form, a single entry otherwise.
    pub target: Vec<String>,
    /// Free-text references (e.g. `src/app.c:42`).
    pub locations: Vec<String>,
}

impl TranslatableUnit {
    #[must_use]
    pub fn has_plural(&self) -> bool {
        self.source.len() > 1 || self.target.len() > 1
    }

    /// Pair every target form with the source form it translates.
    ///
    /// Target forms beyond the last source form pair with the last source form
    /// (a language may need more plural forms than the source language has).
    pub fn plural_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        let last = self.source.len().saturating_sub(1);
        self.target.iter().enumerate().map(move |(i, target)| {
            let source = self
                .source
                .get(i.min(last))
                .map_or("", String::as_str);
            (source, target.as_str())
        })
    }

    /// Position of this unit in the `(store_id, index, id)` iteration order.
    #[must_use]
    pub const fn cursor(&self) -> UnitCursor {
        UnitCursor {
            store_id: self.store_id,
            index: self.index,
            id: self.id,
        }
    }
}

/// Keyset position in the checkable-unit stream.
///
/// Field order matters: the derived `Ord` compares `store_id`, then `index`,
/// then `id`, which is the order units must be visited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitCursor {
    pub store_id: StoreId,
    pub index: i64,
    pub id: UnitId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &[&str], target: &[&str]) -> TranslatableUnit {
        TranslatableUnit {
            id: 1,
            store_id: 1,
            index: 0,
            translation_project_id: 1,
            language_code: "fr".into(),
            state: UnitState::Translated,
            source: source.iter().map(ToString::to_string).collect(),
            target: target.iter().map(ToString::to_string).collect(),
            locations: Vec::new(),
        }
    }

    #[test]
    fn singular_unit_has_one_pair() {
        let u = unit(&["File"], &["Fichier"]);
        assert!(!u.has_plural());
        assert_eq!(u.plural_pairs().collect::<Vec<_>>(), vec![("File", "Fichier")]);
    }

    #[test]
    fn extra_target_forms_pair_with_last_source_form() {
        let u = unit(&["%d file", "%d files"], &["%d plik", "%d pliki", "%d plików"]);
        assert!(u.has_plural());
        let pairs: Vec<_> = u.plural_pairs().collect();
        assert_eq!(pairs[0], ("%d file", "%d plik"));
        assert_eq!(pairs[1], ("%d files", "%d pliki"));
        assert_eq!(pairs[2], ("%d files", "%d plików"));
    }

    #[test]
    fn cursor_orders_by_store_then_index() {
        let a = UnitCursor { store_id: 1, index: 9, id: 50 };
        let b = UnitCursor { store_id: 2, index: 0, id: 3 };
        let c = UnitCursor { store_id: 2, index: 1, id: 1 };
        assert!(a < b);
        assert!(b < c);
    }
}

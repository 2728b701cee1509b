//! A named bundle of rules, runnable as a [`Checker`].

use qc_core::checks::{CheckFailure, CheckFailures, CheckNames};
use qc_core::unit::TranslatableUnit;
use qc_engine::Checker;

use crate::rules::{CheckDefinition, CheckInput};

#[derive(Debug, Clone)]
pub struct CheckSuite {
    name: String,
    rules: Vec<CheckDefinition>,
}

impl CheckSuite {
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<CheckDefinition>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> impl Iterator<Item = &CheckDefinition> {
        self.rules.iter()
    }

    /// Names of the rules in this suite.
    #[must_use]
    pub fn check_names(&self) -> CheckNames {
        self.rules.iter().map(|r| r.name.to_string()).collect()
    }
}

impl Checker for CheckSuite {
    /// Runs each selected rule over every source/target plural pair.
    ///
    /// A rule fails the unit on its first failing pair; the message of that
    /// pair is reported.
    fn run(&self, unit: &TranslatableUnit, subset: Option<&CheckNames>) -> CheckFailures {
        let mut failures = CheckFailures::new();
        let selected = self
            .rules
            .iter()
            .filter(|r| subset.is_none_or(|names| names.contains(r.name)));

        for rule in selected {
            let message = unit
                .plural_pairs()
                .filter(|(_, target)| !target.is_empty())
                .find_map(|(source, target)| {
                    (rule.test)(&CheckInput {
                        source,
                        target,
                        language_code: &unit.language_code,
                        locations: &unit.locations,
                    })
                });
            if let Some(message) = message {
                failures.insert(
                    rule.name.to_string(),
                    CheckFailure {
                        message,
                        category: rule.category,
                    },
                );
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ALL_RULES;
    use pretty_assertions::assert_eq;
    use qc_core::enums::{CheckCategory, UnitState};

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

    fn standard() -> CheckSuite {
        CheckSuite::new("standard", ALL_RULES.to_vec())
    }

    #[test]
    fn clean_translation_has_no_failures() {
        let failures = standard().run(&unit(&["Save file."], &["Enregistrer le fichier."]), None);
        assert!(failures.is_empty(), "{failures:?}");
    }

    #[test]
    fn failures_carry_rule_category() {
        let failures = standard().run(&unit(&["%d files."], &["fichiers"]), None);
        let names: Vec<&str> = failures.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["endpunc", "printf"]);
        assert_eq!(failures["printf"].category, CheckCategory::Critical);
        assert_eq!(failures["endpunc"].category, CheckCategory::Cosmetic);
    }

    #[test]
    fn subset_runs_only_named_rules() {
        let subset: CheckNames = ["endpunc".to_string()].into();
        let failures = standard().run(&unit(&["%d files."], &["fichiers"]), Some(&subset));
        assert_eq!(failures.keys().collect::<Vec<_>>(), vec!["endpunc"]);
    }

    #[test]
    fn plural_forms_are_checked_pairwise() {
        let u = unit(&["%d file", "%d files"], &["%d fichier", "fichiers"]);
        let failures = standard().run(&u, None);
        assert_eq!(
            failures["printf"].message,
            "Missing printf variable: %d".to_string()
        );
    }

    #[test]
    fn extra_target_plural_forms_use_last_source_form() {
        let u = unit(
            &["%d file", "%d files"],
            &["%d plik", "%d pliki", "%d plików"],
        );
        assert!(standard().run(&u, None).is_empty());
    }

    #[test]
    fn empty_plural_form_is_not_checked() {
        let u = unit(&["%d file", "%d files"], &["%d fichier", ""]);
        assert!(standard().run(&u, None).is_empty());
    }
}

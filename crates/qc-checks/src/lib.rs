//! # qc-checks
//!
//! Built-in translation quality rules and the suites that bundle them.
//!
//! A [`CheckSuite`] implements [`qc_engine::Checker`]; a [`CheckCatalog`] maps
//! the suite name a translation project is configured with to its suite and
//! reports the universe of check names used to purge retired checks.

pub mod catalog;
pub mod error;
pub mod rules;
pub mod suite;

pub use catalog::{CheckCatalog, CheckInfo, DEFAULT_SUITE};
pub use error::CatalogError;
pub use rules::{ALL_RULES, CheckDefinition, CheckInput};
pub use suite::CheckSuite;

//! Repository modules.
//!
//! Each module adds methods to `QcService` via `impl QcService` blocks.

pub mod check;
pub mod project;
pub mod stats;
pub mod store;
pub mod unit;

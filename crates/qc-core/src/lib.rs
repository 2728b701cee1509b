//! # qc-core
//!
//! Core types and error types for the quality-check reconciliation engine.
//!
//! This crate provides the foundational types shared across all `qc` crates:
//! - The read-only `TranslatableUnit` projection and its ordering cursor
//! - Unit states and check categories with their storage encodings
//! - Persisted check records, live check failures, and per-unit check sets
//! - Translation projects, stores, and unit inserts
//! - Run scoping and the run summary returned to callers
//! - Cross-cutting error types

pub mod checks;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod scope;
pub mod unit;

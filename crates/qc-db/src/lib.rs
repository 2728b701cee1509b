//! # qc-db
//!
//! libSQL storage for the quality-check engine.
//!
//! Holds translation projects, stores, units, their persisted quality checks,
//! and cached per-store statistics. [`service::QcService`] hosts every repo
//! method and implements the engine's storage seams (`CheckStore`,
//! `UnitSource`, `CacheInvalidator`); [`registry::CatalogRegistry`] resolves a
//! translation project's check suite from its stored checker style.

pub mod engine;
pub mod error;
pub mod helpers;
mod migrations;
pub mod registry;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Open database handle.
pub struct QcDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl QcDb {
    /// Open a local database at `path` (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let qc_db = Self { db, conn };
        qc_db.run_migrations().await?;
        Ok(qc_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

//! Service layer hosting every repo method.
//!
//! `QcService` wraps `QcDb`; repos add methods via `impl QcService` blocks in
//! [`crate::repos`], and [`crate::engine`] maps them onto the engine's seams.

use crate::QcDb;
use crate::error::DatabaseError;

pub struct QcService {
    db: QcDb,
}

impl QcService {
    /// Open (and migrate) a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = QcDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    #[must_use]
    pub const fn from_db(db: QcDb) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &QcDb {
        &self.db
    }
}

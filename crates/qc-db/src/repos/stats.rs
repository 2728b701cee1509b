//! Cached per-store check statistics.
//!
//! A row in `store_stats` is the cache; invalidation deletes it and the next
//! read recomputes it from `quality_checks`.

use chrono::Utc;
use qc_core::enums::CheckCategory;
use qc_core::responses::StoreStats;
use qc_core::unit::StoreId;

use crate::error::DatabaseError;
use crate::service::QcService;

fn count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("negative count {value}")))
}

fn row_to_stats(row: &libsql::Row) -> Result<StoreStats, DatabaseError> {
    Ok(StoreStats {
        store_id: row.get(0)?,
        active_checks: count(row, 1)?,
        critical_checks: count(row, 2)?,
        muted_checks: count(row, 3)?,
        computed_at: row.get(4)?,
    })
}

impl QcService {
    /// Drop the cached statistics of a store. Returns whether a cache row existed.
    pub async fn invalidate_store_stats(&self, store_id: StoreId) -> Result<bool, DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute("DELETE FROM store_stats WHERE store_id = ?1", [store_id])
            .await?;
        Ok(removed > 0)
    }

    pub async fn cached_store_stats(
        &self,
        store_id: StoreId,
    ) -> Result<Option<StoreStats>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT store_id, active_checks, critical_checks, muted_checks, computed_at
                 FROM store_stats WHERE store_id = ?1",
                [store_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_stats(&row)?)),
            None => Ok(None),
        }
    }

    /// Statistics of a store, recomputed and cached if missing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the store does not exist.
    pub async fn store_stats(&self, store_id: StoreId) -> Result<StoreStats, DatabaseError> {
        if let Some(cached) = self.cached_store_stats(store_id).await? {
            return Ok(cached);
        }
        self.get_store(store_id).await?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT OR REPLACE INTO store_stats
                     (store_id, active_checks, critical_checks, muted_checks, computed_at)
                 SELECT ?1,
                        COALESCE(SUM(CASE WHEN qc.false_positive = 0 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN qc.false_positive = 0 AND qc.category = ?2
                                          THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN qc.false_positive = 1 THEN 1 ELSE 0 END), 0),
                        ?3
                 FROM quality_checks qc
                 JOIN units u ON u.id = qc.unit_id
                 WHERE u.store_id = ?1
                 RETURNING store_id, active_checks, critical_checks, muted_checks, computed_at",
                libsql::params![
                    store_id,
                    CheckCategory::Critical.as_i64(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_stats(&row)
    }
}

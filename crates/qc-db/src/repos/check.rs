//! Quality check repository: grouped loads, bulk writes, purges, and mutes.

use std::collections::HashMap;

use qc_core::checks::{CheckNames, CheckSet, NewCheck, PersistedCheck};
use qc_core::enums::{CheckCategory, UnitState};
use qc_core::scope::Scope;
use qc_core::unit::UnitId;
use qc_engine::PurgeOutcome;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{ID_CHUNK, placeholders, scope_filter};
use crate::service::QcService;

const SELECT_COLS: &str =
    "qc.id, qc.unit_id, qc.name, qc.message, qc.category, qc.false_positive";

const RETURNING_COLS: &str = "id, unit_id, name, message, category, false_positive";

/// Rows per multi-row INSERT.
const INSERT_CHUNK: usize = 200;

fn row_to_check(row: &libsql::Row) -> Result<PersistedCheck, DatabaseError> {
    Ok(PersistedCheck {
        id: row.get(0)?,
        unit_id: row.get(1)?,
        name: row.get(2)?,
        message: row.get(3)?,
        category: CheckCategory::from_i64(row.get(4)?)?,
        false_positive: row.get::<i64>(5)? != 0,
    })
}

fn id_params(ids: &[i64]) -> Vec<libsql::Value> {
    ids.iter().map(|id| libsql::Value::from(*id)).collect()
}

impl QcService {
    /// Checks of every unit in `scope`, optionally limited to `check_names`.
    pub async fn load_checks_grouped(
        &self,
        scope: &Scope,
        check_names: Option<&CheckNames>,
    ) -> Result<HashMap<UnitId, CheckSet>, DatabaseError> {
        let (scope_sql, mut params) = scope_filter(scope, 1);
        let mut names_sql = String::new();
        if let Some(names) = check_names {
            names_sql = format!(
                " AND qc.name IN ({})",
                placeholders(params.len() + 1, names.len())
            );
            params.extend(names.iter().map(|n| libsql::Value::from(n.clone())));
        }

        let sql = format!(
            "SELECT {SELECT_COLS} FROM quality_checks qc
             JOIN units u ON u.id = qc.unit_id
             JOIN stores s ON s.id = u.store_id
             WHERE 1 = 1{scope_sql}{names_sql}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut grouped: HashMap<UnitId, CheckSet> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let check = row_to_check(&row)?;
            grouped.entry(check.unit_id).or_default().insert(check);
        }
        Ok(grouped)
    }

    /// Insert checks, unmuted, in one transaction.
    ///
    /// Fails without writing anything if any `(unit_id, name)` already exists.
    pub async fn create_checks(&self, checks: &[NewCheck]) -> Result<u64, DatabaseError> {
        if checks.is_empty() {
            return Ok(0);
        }
        let tx = self.db().conn().transaction().await?;
        let mut created = 0;
        for chunk in checks.chunks(INSERT_CHUNK) {
            let values: Vec<String> = (0..chunk.len())
                .map(|i| {
                    let base = i * 4;
                    format!("(?{}, ?{}, ?{}, ?{}, 0)", base + 1, base + 2, base + 3, base + 4)
                })
                .collect();
            let mut params: Vec<libsql::Value> = Vec::with_capacity(chunk.len() * 4);
            for check in chunk {
                params.push(check.unit_id.into());
                params.push(check.name.clone().into());
                params.push(check.message.clone().into());
                params.push(check.category.as_i64().into());
            }
            let sql = format!(
                "INSERT INTO quality_checks (unit_id, name, message, category, false_positive)
                 VALUES {}",
                values.join(", ")
            );
            created += tx.execute(&sql, libsql::params_from_iter(params)).await?;
        }
        tx.commit().await?;
        Ok(created)
    }

    pub async fn delete_checks(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut removed = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "DELETE FROM quality_checks WHERE id IN ({})",
                placeholders(1, chunk.len())
            );
            removed += self
                .db()
                .conn()
                .execute(&sql, libsql::params_from_iter(id_params(chunk)))
                .await?;
        }
        Ok(removed)
    }

    /// Clear the mute flag on the given checks; already-unmuted rows are not counted.
    pub async fn unmute_checks(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut unmuted = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "UPDATE quality_checks SET false_positive = 0
                 WHERE false_positive = 1 AND id IN ({})",
                placeholders(1, chunk.len())
            );
            unmuted += self
                .db()
                .conn()
                .execute(&sql, libsql::params_from_iter(id_params(chunk)))
                .await?;
        }
        Ok(unmuted)
    }

    /// Delete every check whose name is not in `known`, regardless of scope.
    pub async fn delete_unknown_checks(&self, known: &CheckNames) -> Result<u64, DatabaseError> {
        let removed = if known.is_empty() {
            self.db()
                .conn()
                .execute("DELETE FROM quality_checks", ())
                .await?
        } else {
            let sql = format!(
                "DELETE FROM quality_checks WHERE name NOT IN ({})",
                placeholders(1, known.len())
            );
            let params: Vec<libsql::Value> =
                known.iter().map(|n| libsql::Value::from(n.clone())).collect();
            self.db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?
        };
        if removed > 0 {
            debug!(removed, "deleted checks with unknown names");
        }
        Ok(removed)
    }

    /// Delete the checks of units in `scope` whose state is below `threshold`.
    ///
    /// Reports the distinct `(translation project, store)` pairs that lost rows.
    pub async fn delete_checks_below_threshold(
        &self,
        scope: &Scope,
        threshold: UnitState,
    ) -> Result<PurgeOutcome, DatabaseError> {
        let (scope_sql, scope_params) = scope_filter(scope, 2);
        let mut params: Vec<libsql::Value> = vec![threshold.as_i64().into()];
        params.extend(scope_params);

        let tx = self.db().conn().transaction().await?;
        let mut outcome = PurgeOutcome::default();
        {
            let mut rows = tx
                .query(
                    &format!(
                        "SELECT DISTINCT s.translation_project_id, u.store_id
                         FROM quality_checks qc
                         JOIN units u ON u.id = qc.unit_id
                         JOIN stores s ON s.id = u.store_id
                         WHERE u.state < ?1{scope_sql}
                         ORDER BY s.translation_project_id, u.store_id"
                    ),
                    libsql::params_from_iter(params.clone()),
                )
                .await?;
            while let Some(row) = rows.next().await? {
                outcome.stores.push((row.get(0)?, row.get(1)?));
            }
        }
        if !outcome.stores.is_empty() {
            outcome.removed = tx
                .execute(
                    &format!(
                        "DELETE FROM quality_checks WHERE unit_id IN (
                             SELECT u.id FROM units u
                             JOIN stores s ON s.id = u.store_id
                             WHERE u.state < ?1{scope_sql}
                         )"
                    ),
                    libsql::params_from_iter(params),
                )
                .await?;
        }
        tx.commit().await?;
        Ok(outcome)
    }

    /// Every check of one unit, by name.
    pub async fn list_unit_checks(
        &self,
        unit_id: UnitId,
    ) -> Result<Vec<PersistedCheck>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM quality_checks qc
                     WHERE qc.unit_id = ?1 ORDER BY qc.name"
                ),
                [unit_id],
            )
            .await?;
        let mut checks = Vec::new();
        while let Some(row) = rows.next().await? {
            checks.push(row_to_check(&row)?);
        }
        Ok(checks)
    }

    /// Mute (or unmute) a reviewer-judged check on a unit.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the unit has no check of that name.
    pub async fn set_false_positive(
        &self,
        unit_id: UnitId,
        name: &str,
        false_positive: bool,
    ) -> Result<PersistedCheck, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "UPDATE quality_checks SET false_positive = ?3
                     WHERE unit_id = ?1 AND name = ?2
                     RETURNING {RETURNING_COLS}"
                ),
                libsql::params![unit_id, name, i64::from(false_positive)],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_check(&row)
    }
}

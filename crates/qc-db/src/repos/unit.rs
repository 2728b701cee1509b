//! Unit repository: inserts, state changes, and the ordered checkable stream.

use chrono::{DateTime, Utc};
use qc_core::entities::NewUnit;
use qc_core::enums::UnitState;
use qc_core::scope::Scope;
use qc_core::unit::{TranslatableUnit, UnitCursor, UnitId};

use crate::error::DatabaseError;
use crate::helpers::{
    ID_CHUNK, encode_string_list, parse_datetime, parse_string_list, placeholders, scope_filter,
};
use crate::service::QcService;

const SELECT_COLS: &str = "u.id, u.store_id, u.idx, s.translation_project_id, tp.language_code, \
                           u.state, u.source, u.target, u.locations";

const FROM_UNITS: &str = "FROM units u
     JOIN stores s ON s.id = u.store_id
     JOIN translation_projects tp ON tp.id = s.translation_project_id";

fn row_to_unit(row: &libsql::Row) -> Result<TranslatableUnit, DatabaseError> {
    Ok(TranslatableUnit {
        id: row.get(0)?,
        store_id: row.get(1)?,
        index: row.get(2)?,
        translation_project_id: row.get(3)?,
        language_code: row.get(4)?,
        state: UnitState::from_i64(row.get(5)?)?,
        source: parse_string_list(&row.get::<String>(6)?)?,
        target: parse_string_list(&row.get::<String>(7)?)?,
        locations: parse_string_list(&row.get::<String>(8)?)?,
    })
}

impl QcService {
    pub async fn add_unit(&self, unit: &NewUnit) -> Result<TranslatableUnit, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO units (store_id, idx, state, source, target, locations, mtime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id",
                libsql::params![
                    unit.store_id,
                    unit.index,
                    unit.state.as_i64(),
                    encode_string_list(&unit.source)?,
                    encode_string_list(&unit.target)?,
                    encode_string_list(&unit.locations)?,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id: UnitId = row.get(0)?;
        drop(rows);
        self.get_unit(id).await
    }

    pub async fn get_unit(&self, id: UnitId) -> Result<TranslatableUnit, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} {FROM_UNITS} WHERE u.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_unit(&row)
    }

    pub async fn set_unit_state(&self, id: UnitId, state: UnitState) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE units SET state = ?2, mtime = ?3 WHERE id = ?1",
                libsql::params![id, state.as_i64(), Utc::now().to_rfc3339()],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Replace a unit's target text and state together, as a translator edit does.
    pub async fn set_unit_target(
        &self,
        id: UnitId,
        target: &[String],
        state: UnitState,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE units SET target = ?2, state = ?3, mtime = ?4 WHERE id = ?1",
                libsql::params![
                    id,
                    encode_string_list(target)?,
                    state.as_i64(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    pub async fn unit_mtime(&self, id: UnitId) -> Result<DateTime<Utc>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT mtime FROM units WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        parse_datetime(&row.get::<String>(0)?)
    }

    /// Next page of units in `scope` at or above `threshold`.
    ///
    /// Ordered by `(store_id, idx, id)`, starting strictly after `after`.
    pub async fn checkable_units_page(
        &self,
        scope: &Scope,
        threshold: UnitState,
        after: Option<UnitCursor>,
        limit: u32,
    ) -> Result<Vec<TranslatableUnit>, DatabaseError> {
        let mut params: Vec<libsql::Value> = vec![threshold.as_i64().into()];
        let mut cursor_sql = String::new();
        if let Some(cursor) = after {
            cursor_sql = " AND (u.store_id, u.idx, u.id) > (?2, ?3, ?4)".to_string();
            params.extend([
                libsql::Value::from(cursor.store_id),
                libsql::Value::from(cursor.index),
                libsql::Value::from(cursor.id),
            ]);
        }
        let (scope_sql, scope_params) = scope_filter(scope, params.len() + 1);
        params.extend(scope_params);
        let limit_idx = params.len() + 1;
        params.push(i64::from(limit).into());

        let sql = format!(
            "SELECT {SELECT_COLS} {FROM_UNITS}
             WHERE u.state >= ?1{cursor_sql}{scope_sql}
             ORDER BY u.store_id, u.idx, u.id
             LIMIT ?{limit_idx}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut units = Vec::new();
        while let Some(row) = rows.next().await? {
            units.push(row_to_unit(&row)?);
        }
        Ok(units)
    }

    /// Bump the modification time of the given units.
    pub async fn touch_units(&self, ids: &[UnitId]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = Utc::now().to_rfc3339();
        let mut touched = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let mut params: Vec<libsql::Value> = vec![now.clone().into()];
            params.extend(chunk.iter().map(|id| libsql::Value::from(*id)));
            let sql = format!(
                "UPDATE units SET mtime = ?1 WHERE id IN ({})",
                placeholders(2, chunk.len())
            );
            touched += self
                .db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
        }
        Ok(touched)
    }
}

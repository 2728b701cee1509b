//! Row parsing and SQL-building helpers shared by the repos.

use chrono::{DateTime, Utc};
use qc_core::scope::{MAX_SCOPE_IDS, Scope};

use crate::error::DatabaseError;

/// Parse a TEXT timestamp column.
///
/// Handles both RFC 3339 (written by the repos) and `SQLite`'s
/// `datetime('now')` default format.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode a TEXT column holding a JSON array of strings.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is not such an array.
pub fn parse_string_list(s: &str) -> Result<Vec<String>, DatabaseError> {
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Invalid string list in column: {e}")))
}

/// Encode strings for a JSON array TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn encode_string_list(items: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(items).map_err(|e| DatabaseError::Other(e.into()))
}

/// `?n, ?n+1, ...` for `count` parameters starting at `first`.
#[must_use]
pub fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ids bound per statement by id-list writes.
pub const ID_CHUNK: usize = MAX_SCOPE_IDS as usize;

/// SQL conditions and parameters restricting unit rows to a [`Scope`].
///
/// Expects the query to alias `units` as `u` and `stores` as `s`. The
/// returned clause is either empty or starts with ` AND `.
#[must_use]
pub fn scope_filter(scope: &Scope, first: usize) -> (String, Vec<libsql::Value>) {
    let mut sql = String::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(tp) = scope.translation_project {
        sql.push_str(&format!(" AND s.translation_project_id = ?{}", first + params.len()));
        params.push(tp.into());
    }
    if let Some(stores) = &scope.stores {
        sql.push_str(&format!(
            " AND u.store_id IN ({})",
            placeholders(first + params.len(), stores.len())
        ));
        params.extend(stores.iter().map(|id| libsql::Value::from(*id)));
    }
    if let Some(units) = &scope.units {
        sql.push_str(&format!(
            " AND u.id IN ({})",
            placeholders(first + params.len(), units.len())
        ));
        params.extend(units.iter().map(|id| libsql::Value::from(*id)));
    }
    (sql, params)
}

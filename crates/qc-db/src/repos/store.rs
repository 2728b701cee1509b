//! Store repository.

use qc_core::entities::Store;
use qc_core::unit::{ProjectId, StoreId};

use crate::error::DatabaseError;
use crate::service::QcService;

const SELECT_COLS: &str = "id, translation_project_id, path";

fn row_to_store(row: &libsql::Row) -> Result<Store, DatabaseError> {
    Ok(Store {
        id: row.get(0)?,
        translation_project_id: row.get(1)?,
        path: row.get(2)?,
    })
}

impl QcService {
    pub async fn create_store(
        &self,
        translation_project_id: ProjectId,
        path: &str,
    ) -> Result<Store, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "INSERT INTO stores (translation_project_id, path)
                     VALUES (?1, ?2)
                     RETURNING {SELECT_COLS}"
                ),
                libsql::params![translation_project_id, path],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_store(&row)
    }

    pub async fn get_store(&self, id: StoreId) -> Result<Store, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM stores WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_store(&row)
    }

    pub async fn list_stores(
        &self,
        translation_project_id: ProjectId,
    ) -> Result<Vec<Store>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM stores
                     WHERE translation_project_id = ?1 ORDER BY id"
                ),
                [translation_project_id],
            )
            .await?;
        let mut stores = Vec::new();
        while let Some(row) = rows.next().await? {
            stores.push(row_to_store(&row)?);
        }
        Ok(stores)
    }
}

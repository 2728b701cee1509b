//! Translation project repository.

use qc_core::entities::TranslationProject;
use qc_core::unit::ProjectId;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::QcService;

const SELECT_COLS: &str = "id, code, language_code, checker_style";

fn row_to_project(row: &libsql::Row) -> Result<TranslationProject, DatabaseError> {
    Ok(TranslationProject {
        id: row.get(0)?,
        code: row.get(1)?,
        language_code: row.get(2)?,
        checker_style: get_opt_string(row, 3)?,
    })
}

impl QcService {
    pub async fn create_translation_project(
        &self,
        code: &str,
        language_code: &str,
        checker_style: Option<&str>,
    ) -> Result<TranslationProject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "INSERT INTO translation_projects (code, language_code, checker_style)
                     VALUES (?1, ?2, ?3)
                     RETURNING {SELECT_COLS}"
                ),
                libsql::params![code, language_code, checker_style],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_project(&row)
    }

    /// Look up a project; `None` if it does not exist.
    pub async fn find_translation_project(
        &self,
        id: ProjectId,
    ) -> Result<Option<TranslationProject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM translation_projects WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn set_checker_style(
        &self,
        id: ProjectId,
        checker_style: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE translation_projects SET checker_style = ?2 WHERE id = ?1",
                libsql::params![id, checker_style],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

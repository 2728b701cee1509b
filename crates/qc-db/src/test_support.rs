//! Shared fixtures for qc-db unit tests.

use qc_core::entities::{NewUnit, Store, TranslationProject};
use qc_core::enums::UnitState;
use qc_core::unit::TranslatableUnit;

use crate::service::QcService;

pub async fn test_service() -> QcService {
    QcService::new_local(":memory:").await.unwrap()
}

/// A project `fr/app` with one store, `fr/app/messages.po`.
pub async fn project_with_store(svc: &QcService) -> (TranslationProject, Store) {
    let tp = svc
        .create_translation_project("fr/app", "fr", None)
        .await
        .unwrap();
    let store = svc.create_store(tp.id, "fr/app/messages.po").await.unwrap();
    (tp, store)
}

pub async fn add_translated(
    svc: &QcService,
    store: &Store,
    index: i64,
    source: &str,
    target: &str,
) -> TranslatableUnit {
    svc.add_unit(&NewUnit::translated(store.id, index, source, target))
        .await
        .unwrap()
}

/// Insert `count` clean translated units into `store` in one statement.
pub async fn insert_clean_units(svc: &QcService, store: &Store, count: i64) {
    svc.db()
        .conn()
        .execute(
            "WITH RECURSIVE n(i) AS (SELECT 0 UNION ALL SELECT i + 1 FROM n WHERE i + 1 < ?2)
             INSERT INTO units (store_id, idx, state, source, target)
             SELECT ?1, i, ?3, '[\"Save file.\"]', '[\"Enregistrer le fichier.\"]' FROM n",
            libsql::params![store.id, count, UnitState::Translated.as_i64()],
        )
        .await
        .unwrap();
}

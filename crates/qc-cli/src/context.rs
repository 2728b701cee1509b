use std::path::Path;

use anyhow::Context;
use qc_config::QcConfig;
use qc_db::service::QcService;

use crate::cli::GlobalFlags;

/// Loaded configuration plus an open database.
pub struct AppContext {
    pub config: QcConfig,
    pub service: QcService,
}

impl AppContext {
    pub async fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut config = QcConfig::load_with_dotenv().context("failed to load qc configuration")?;
        if let Some(db) = &flags.db {
            config.database.path.clone_from(db);
        }

        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let service = QcService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "database opened");
        Ok(Self { config, service })
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown check suite '{0}'")]
    UnknownSuite(String),
}

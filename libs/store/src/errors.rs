// [libs/store/src/errors.rs]
use thiserror::Error;
use warroom_domain::error::DomainError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query rejected: {0}")]
    Query(#[from] libsql::Error),

    #[error("row mapping failed: {0}")]
    Mapping(String),

    #[error("record not found: {0}")]
    NotFound(&'static str),

    #[error("unique constraint violated: {0}")]
    Conflict(&'static str),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(what) => DomainError::NotFound(what),
            StoreError::Conflict(what) => DomainError::Conflict(what),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

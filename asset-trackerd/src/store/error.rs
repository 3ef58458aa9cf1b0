use shared::asset_id::IdError;
use shared::validate::ValidationError;

/// Failures surfaced by the asset store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("asset {0} not found")]
    NotFound(String),

    #[error("asset {0} already exists")]
    Duplicate(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

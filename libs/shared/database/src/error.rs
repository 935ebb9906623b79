use shared_models::AppError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("healthcheck {0} not found")]
    HealthCheckNotFound(String),

    #[error("item {0} not found")]
    ItemNotFound(String),

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("group {0} not found")]
    GroupNotFound(String),

    #[error("no healthcheck owns group {0}")]
    UnknownGroup(String),

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("healthcheck {0} still has items")]
    HealthCheckHasItems(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HealthCheckNotFound(_)
            | StorageError::ItemNotFound(_)
            | StorageError::UserNotFound(_)
            | StorageError::GroupNotFound(_) => AppError::NotFound(err.to_string()),
            StorageError::Duplicate(_) => AppError::Conflict(err.to_string()),
            StorageError::UnknownGroup(_) | StorageError::HealthCheckHasItems(_) => {
                AppError::Database(err.to_string())
            }
        }
    }
}

use isay_sync::{ResourceId, SyncError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid field assignment `{0}`, expected campo=valor")]
    Field(String),
    #[error("no record with id {0}")]
    NotFound(ResourceId),
    #[error("not logged in")]
    NotLoggedIn,
}

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Issue not found: {0}")]
    NotFound(Uuid),

    #[error("Only the reporter of issue {0} can delete it")]
    NotOwner(Uuid),

    #[error("Stored issues are unreadable: {0}")]
    StorageCorrupt(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, CivicError>;

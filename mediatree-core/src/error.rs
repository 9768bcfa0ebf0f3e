use mediatree_model::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    /// The path escapes the media root. Never carries the path.
    #[error("Access denied")]
    AccessDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::AccessDenied => ErrorKind::AccessDenied,
            MediaError::NotFound(_) => ErrorKind::NotFound,
            MediaError::Validation(_) => ErrorKind::ValidationError,
            MediaError::Io(_)
            | MediaError::Serialization(_)
            | MediaError::Internal(_) => ErrorKind::TransientIoError,
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;

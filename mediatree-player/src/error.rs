use mediatree_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Everything the player surfaces to the user.
///
/// None of these are fatal: each one degrades to a visible, recoverable
/// state and the session carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Temporarily unavailable: {0}")]
    TransientIo(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

impl PlayerError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlayerError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlayerError::AccessDenied => ErrorKind::AccessDenied,
            PlayerError::NotFound(_) => ErrorKind::NotFound,
            PlayerError::Validation(_) => ErrorKind::ValidationError,
            PlayerError::TransientIo(_) => ErrorKind::TransientIoError,
            PlayerError::Playback(_) => ErrorKind::PlaybackError,
        }
    }

    /// Rebuilds an error from the kind and message the server reported.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::AccessDenied => PlayerError::AccessDenied,
            ErrorKind::NotFound => PlayerError::NotFound(message),
            ErrorKind::ValidationError => PlayerError::Validation(message),
            ErrorKind::TransientIoError => PlayerError::TransientIo(message),
            ErrorKind::PlaybackError => PlayerError::Playback(message),
        }
    }
}

impl From<std::io::Error> for PlayerError {
    fn from(err: std::io::Error) -> Self {
        PlayerError::TransientIo(err.to_string())
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::TransientIo(err.to_string())
    }
}

impl From<reqwest::Error> for PlayerError {
    fn from(err: reqwest::Error) -> Self {
        PlayerError::TransientIo(err.to_string())
    }
}

impl From<ModelError> for PlayerError {
    fn from(err: ModelError) -> Self {
        PlayerError::Validation(err.to_string())
    }
}

pub type PlayerResult<T> = Result<T, PlayerError>;

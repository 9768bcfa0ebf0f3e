use std::fmt::{self, Display};

/// Failure categories shared by the server and the player.
///
/// The server renders one of these into every error body so the client can
/// pick an appropriate message without ever seeing file-system details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// The requested path escapes the media root.
    AccessDenied,
    /// The path is sandboxed but nothing lives there.
    NotFound,
    /// Malformed input caught at the boundary.
    ValidationError,
    /// Backend unreachable or a file-system fault.
    TransientIoError,
    /// The media element reported a decode or network fault.
    PlaybackError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::TransientIoError => "transient_io_error",
            ErrorKind::PlaybackError => "playback_error",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while parsing model values from their textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidValue { field: &'static str, value: String },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidValue { field, value } => {
                write!(f, "invalid value '{value}' for {field}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;

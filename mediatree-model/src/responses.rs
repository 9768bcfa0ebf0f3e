use chrono::{DateTime, Utc};

use crate::entry::{Entry, SearchHit};
use crate::error::ErrorKind;

/// One clickable segment of the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Breadcrumb {
    pub label: String,
    pub relative_path: String,
}

/// A filtered, sorted listing of one directory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BrowseResponse {
    pub current_path: String,
    /// Empty when the listing is the root itself.
    pub parent_path: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub items: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total_results: usize,
}

impl SearchResponse {
    pub fn new(results: Vec<SearchHit>) -> Self {
        let total_results = results.len();
        Self {
            results,
            total_results,
        }
    }
}

/// Metadata for a single video file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VideoInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub extension: String,
    pub mime_type: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ThumbnailResponse {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub thumbnail_url: Option<String>,
}

/// Envelope used for every non-2xx JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    pub status: u16,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            error: ErrorDetail {
                kind,
                message: message.into(),
                status,
            },
        }
    }
}

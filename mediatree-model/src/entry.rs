use chrono::{DateTime, Utc};

/// One file-system node as exposed to clients.
///
/// `path` is root-relative, forward-slash separated, and never contains a
/// `..` segment or a leading separator. Entries carry no identity beyond
/// their path; two entries with the same path are interchangeable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub is_video: bool,
    /// Size in bytes, 0 for directories.
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    /// Lowercased, without the dot. Empty when the name has no extension.
    pub extension: String,
}

impl Entry {
    /// Neither a directory nor a recognised video.
    pub fn is_other(&self) -> bool {
        !self.is_directory && !self.is_video
    }
}

/// A search result: an [`Entry`] plus the path shown to the user.
///
/// `relative_path` is for display and is relative to the search root;
/// `entry.path` stays the resolver-safe identifier for follow-up requests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SearchHit {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub entry: Entry,
    pub relative_path: String,
}

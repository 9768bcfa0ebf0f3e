use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entry::Entry;

/// A named, ordered list of videos saved on the server.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub videos: Vec<Entry>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Favorite {
    pub id: Uuid,
    pub path: String,
    pub name: String,
}

/// Body of `POST /api/v1/playlists`. Videos are root-relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub videos: Vec<String>,
}

/// Body of `POST /api/v1/favorites`. The name defaults to the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CreateFavoriteRequest {
    pub path: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
}

//! JSON-file store for playlists and favorites.
//!
//! The whole document lives in memory behind a lock and is rewritten on
//! every mutation through a temp file in the same directory followed by an
//! atomic rename, so a crash leaves either the old or the new document.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use mediatree_model::{
    CreateFavoriteRequest, CreatePlaylistRequest, Entry, Favorite, Playlist,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::classify::MediaClassifier;
use crate::error::{MediaError, Result};
use crate::sandbox::MediaRoot;

pub const COLLECTIONS_FILE_NAME: &str = "collections.json";

static PLAYLIST_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N} \-_.,'()&!]{1,100}$")
        .expect("playlist name pattern is valid")
});

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CollectionsDocument {
    #[serde(default)]
    playlists: Vec<Playlist>,
    #[serde(default)]
    favorites: Vec<Favorite>,
}

#[derive(Debug)]
pub struct CollectionsStore {
    file: PathBuf,
    root: MediaRoot,
    classifier: Arc<MediaClassifier>,
    document: RwLock<CollectionsDocument>,
}

/// Trims and checks a playlist name.
pub fn validate_playlist_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if PLAYLIST_NAME.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(MediaError::Validation(
            "playlist name must be 1-100 letters, digits, spaces or -_.,'()&!"
                .to_string(),
        ))
    }
}

impl CollectionsStore {
    /// Opens (or starts) `<data_dir>/collections.json`.
    pub fn open(
        data_dir: &Path,
        root: MediaRoot,
        classifier: Arc<MediaClassifier>,
    ) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let file = data_dir.join(COLLECTIONS_FILE_NAME);

        let document = match std::fs::read(&file) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                CollectionsDocument::default()
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            file = %file.display(),
            playlists = document.playlists.len(),
            favorites = document.favorites.len(),
            "collections store opened"
        );

        Ok(Self {
            file,
            root,
            classifier,
            document: RwLock::new(document),
        })
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        self.document.read().playlists.clone()
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        self.document.read().favorites.clone()
    }

    pub fn create_playlist(&self, request: CreatePlaylistRequest) -> Result<Playlist> {
        let name = validate_playlist_name(&request.name)?;
        let videos = request
            .videos
            .iter()
            .map(|path| self.video_entry(path))
            .collect::<Result<Vec<_>>>()?;

        let playlist = Playlist {
            id: Uuid::new_v4(),
            name,
            videos,
            created: Utc::now(),
        };

        self.commit(|document| {
            document.playlists.push(playlist.clone());
            Ok(())
        })?;
        debug!(id = %playlist.id, "playlist created");
        Ok(playlist)
    }

    pub fn delete_playlist(&self, id: Uuid) -> Result<()> {
        self.commit(|document| {
            let before = document.playlists.len();
            document.playlists.retain(|playlist| playlist.id != id);
            if document.playlists.len() == before {
                return Err(MediaError::NotFound(format!("playlist {id}")));
            }
            Ok(())
        })
    }

    pub fn create_favorite(&self, request: CreateFavoriteRequest) -> Result<Favorite> {
        let target = self.root.resolve(&request.path)?;
        if target.is_root() || !target.absolute().exists() {
            return Err(MediaError::NotFound(format!("'{}'", target.relative())));
        }

        let name = request
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| target.file_name().map(str::to_owned))
            .unwrap_or_default();

        let favorite = Favorite {
            id: Uuid::new_v4(),
            path: target.relative().to_string(),
            name,
        };

        self.commit(|document| {
            document.favorites.push(favorite.clone());
            Ok(())
        })?;
        Ok(favorite)
    }

    pub fn delete_favorite(&self, id: Uuid) -> Result<()> {
        self.commit(|document| {
            let before = document.favorites.len();
            document.favorites.retain(|favorite| favorite.id != id);
            if document.favorites.len() == before {
                return Err(MediaError::NotFound(format!("favorite {id}")));
            }
            Ok(())
        })
    }

    /// Applies `change` to a copy of the document and publishes the copy
    /// only once it is on disk. A failed write leaves memory untouched.
    fn commit(
        &self,
        change: impl FnOnce(&mut CollectionsDocument) -> Result<()>,
    ) -> Result<()> {
        let mut document = self.document.write();
        let mut staged = document.clone();
        change(&mut staged)?;
        self.persist(&staged)?;
        *document = staged;
        Ok(())
    }

    fn video_entry(&self, path: &str) -> Result<Entry> {
        let target = self.root.resolve(path)?;
        let missing = || MediaError::NotFound(format!("video '{}'", target.relative()));

        let metadata = std::fs::metadata(target.absolute()).map_err(|_| missing())?;
        let name = target.file_name().ok_or_else(missing)?;
        let entry = self
            .classifier
            .entry(name, target.relative().to_string(), &metadata);
        if !entry.is_video {
            return Err(MediaError::Validation(format!(
                "'{}' is not a video",
                entry.path
            )));
        }
        Ok(entry)
    }

    fn persist(&self, document: &CollectionsDocument) -> Result<()> {
        let dir = self
            .file
            .parent()
            .ok_or_else(|| MediaError::Internal("store file has no parent".to_string()))?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.flush()?;
        tmp.persist(&self.file).map_err(|err| MediaError::Io(err.error))?;
        Ok(())
    }
}

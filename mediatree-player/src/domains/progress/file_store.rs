use std::{
    collections::{BTreeMap, VecDeque},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{ProgressRecord, ProgressStore, validate_position};
use crate::{
    error::{PlayerError, PlayerResult},
    infra::constants::progress::PROGRESS_FILE_NAME,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressFile {
    #[serde(default)]
    records: BTreeMap<String, ProgressRecord>,
}

/// JSON-file store, loaded once at startup and written through on every
/// change via an atomic rename.
///
/// With `max_entries` set, the least recently updated paths are evicted
/// first.
#[derive(Debug)]
pub struct FileProgressStore {
    path: PathBuf,
    records: BTreeMap<String, ProgressRecord>,
    // Least recently updated first
    recency: VecDeque<String>,
    max_entries: Option<usize>,
    dirty: bool,
}

impl FileProgressStore {
    /// Opens the store at `path`. A missing file starts empty; an
    /// unreadable one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> PlayerResult<Self> {
        let path = path.into();
        let file = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<ProgressFile>(&bytes) {
                Ok(file) => file,
                Err(err) => {
                    warn!(
                        "[Progress] Ignoring corrupt store at {}: {}",
                        path.display(),
                        err
                    );
                    ProgressFile::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                ProgressFile::default()
            }
            Err(err) => return Err(err.into()),
        };

        let mut ordered: Vec<_> = file.records.iter().collect();
        ordered.sort_by(|a, b| a.1.updated_at.cmp(&b.1.updated_at));
        let recency = ordered.into_iter().map(|(key, _)| key.clone()).collect();

        debug!(
            "[Progress] Loaded {} resume positions from {}",
            file.records.len(),
            path.display()
        );

        Ok(Self {
            path,
            records: file.records,
            recency,
            max_entries: None,
            dirty: false,
        })
    }

    /// Opens `progress.json` in the platform data directory.
    pub fn open_default() -> PlayerResult<Self> {
        let dirs = ProjectDirs::from("", "", "mediatree").ok_or_else(|| {
            PlayerError::TransientIo("no home directory for progress store".into())
        })?;
        Self::open(dirs.data_dir().join(PROGRESS_FILE_NAME))
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        if self.evict() {
            self.dirty = true;
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, path: &str) -> Option<&ProgressRecord> {
        self.records.get(path)
    }

    fn touch(&mut self, key: &str) {
        self.recency.retain(|existing| existing != key);
        self.recency.push_back(key.to_string());
    }

    fn evict(&mut self) -> bool {
        let Some(max) = self.max_entries else {
            return false;
        };
        let mut evicted = false;
        while self.records.len() > max {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.records.remove(&oldest);
            evicted = true;
        }
        evicted
    }

    fn persist(&mut self) -> PlayerResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let file = ProgressFile {
            records: self.records.clone(),
        };
        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, &file)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;

        self.dirty = false;
        Ok(())
    }

    fn write_through(&mut self) -> PlayerResult<()> {
        self.dirty = true;
        self.persist().inspect_err(|err| {
            warn!("[Progress] Write-through failed, will retry on flush: {}", err);
        })
    }
}

impl ProgressStore for FileProgressStore {
    fn save(&mut self, path: &str, position: f64) -> PlayerResult<()> {
        let position = validate_position(position)?;
        self.records
            .insert(path.to_string(), ProgressRecord::now(position));
        self.touch(path);
        self.evict();
        self.write_through()
    }

    fn restore(&self, path: &str) -> Option<f64> {
        self.records.get(path).map(|record| record.position)
    }

    fn clear(&mut self, path: &str) -> PlayerResult<()> {
        if self.records.remove(path).is_none() {
            return Ok(());
        }
        self.recency.retain(|existing| existing != path);
        self.write_through()
    }

    fn flush(&mut self) -> PlayerResult<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_through_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PROGRESS_FILE_NAME);

        let mut store = FileProgressStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.save("movies/clip.mp4", 42.0).unwrap();
        assert!(path.exists());

        // No flush: write-through alone must be durable
        drop(store);
        let reopened = FileProgressStore::open(&path).unwrap();
        assert_eq!(reopened.restore("movies/clip.mp4"), Some(42.0));
        assert_eq!(reopened.restore("other.mp4"), None);
    }

    #[test]
    fn clear_removes_the_record_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROGRESS_FILE_NAME);

        let mut store = FileProgressStore::open(&path).unwrap();
        store.save("clip.mp4", 10.0).unwrap();
        store.clear("clip.mp4").unwrap();

        let reopened = FileProgressStore::open(&path).unwrap();
        assert_eq!(reopened.restore("clip.mp4"), None);
    }

    #[test]
    fn evicts_least_recently_updated() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileProgressStore::open(dir.path().join("p.json"))
            .unwrap()
            .with_max_entries(2);

        store.save("a.mp4", 1.0).unwrap();
        store.save("b.mp4", 2.0).unwrap();
        store.save("a.mp4", 3.0).unwrap();
        store.save("c.mp4", 4.0).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.restore("b.mp4"), None);
        assert_eq!(store.restore("a.mp4"), Some(3.0));
        assert_eq!(store.restore("c.mp4"), Some(4.0));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROGRESS_FILE_NAME);
        std::fs::write(&path, b"{ not json").unwrap();

        let mut store = FileProgressStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.save("clip.mp4", 5.0).unwrap();
        assert_eq!(
            FileProgressStore::open(&path).unwrap().restore("clip.mp4"),
            Some(5.0)
        );
    }

    #[test]
    fn records_carry_update_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store =
            FileProgressStore::open(dir.path().join("p.json")).unwrap();
        let before = chrono::Utc::now();
        store.save("clip.mp4", 7.0).unwrap();
        let record = store.record("clip.mp4").unwrap();
        assert!(record.updated_at >= before);
    }
}

use std::collections::HashMap;

use super::{ProgressRecord, ProgressStore, validate_position};
use crate::error::PlayerResult;

/// Non-durable store for tests and sessions without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryProgressStore {
    records: HashMap<String, ProgressRecord>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
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
}

impl ProgressStore for MemoryProgressStore {
    fn save(&mut self, path: &str, position: f64) -> PlayerResult<()> {
        let position = validate_position(position)?;
        self.records
            .insert(path.to_string(), ProgressRecord::now(position));
        Ok(())
    }

    fn restore(&self, path: &str) -> Option<f64> {
        self.records.get(path).map(|record| record.position)
    }

    fn clear(&mut self, path: &str) -> PlayerResult<()> {
        self.records.remove(path);
        Ok(())
    }

    fn flush(&mut self) -> PlayerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;

    #[test]
    fn save_then_restore_round_trips() {
        let mut store = MemoryProgressStore::new();
        store.save("movies/clip.mp4", 12.5).unwrap();
        assert_eq!(store.restore("movies/clip.mp4"), Some(12.5));
        assert_eq!(store.restore("unseen.mp4"), None);
    }

    #[test]
    fn last_write_wins() {
        let mut store = MemoryProgressStore::new();
        store.save("clip.mp4", 80.0).unwrap();
        store.save("clip.mp4", 3.0).unwrap();
        assert_eq!(store.restore("clip.mp4"), Some(3.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_invalid_positions() {
        let mut store = MemoryProgressStore::new();
        assert!(matches!(
            store.save("clip.mp4", f64::NAN),
            Err(PlayerError::Validation(_))
        ));
        assert!(store.save("clip.mp4", -1.0).is_err());
        assert!(store.is_empty());
    }
}

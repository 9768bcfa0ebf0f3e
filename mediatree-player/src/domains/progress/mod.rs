//! Resume positions per media path.
//!
//! `save` overwrites unconditionally (last write wins) and `restore` on an
//! unseen path is simply `None`. The file-backed store writes through on
//! every save so an abrupt exit loses at most the sample in flight.

pub mod file_store;
pub mod memory;

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, PlayerResult};

pub use file_store::FileProgressStore;
pub use memory::MemoryProgressStore;

/// Last settled position for one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub position: f64,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn now(position: f64) -> Self {
        Self {
            position,
            updated_at: Utc::now(),
        }
    }
}

pub trait ProgressStore: Debug {
    fn save(&mut self, path: &str, position: f64) -> PlayerResult<()>;
    fn restore(&self, path: &str) -> Option<f64>;
    /// Forgets a path, e.g. once its video played to the end.
    fn clear(&mut self, path: &str) -> PlayerResult<()>;
    /// Makes sure everything saved so far is durable.
    fn flush(&mut self) -> PlayerResult<()>;
}

pub(crate) fn validate_position(position: f64) -> PlayerResult<f64> {
    if position.is_finite() && position >= 0.0 {
        Ok(position)
    } else {
        Err(PlayerError::validation(format!(
            "progress position must be a non-negative number of seconds, got {position}"
        )))
    }
}

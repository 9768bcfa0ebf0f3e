pub mod browse;
pub mod collections;
pub mod health;
pub mod media;
pub mod search;

use serde::Deserialize;

/// `?path=` parameter shared by the per-file endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathQuery {
    pub path: String,
}

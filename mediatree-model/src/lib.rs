//! Core data model definitions shared across mediatree crates.
//!
//! Everything here is plain data: the server builds these values from a
//! sandboxed file-system snapshot and the player consumes them over HTTP.
//! Serialization is opt-in through the `serde` feature so that consumers
//! which only need the types do not pay for the derive machinery.
#![allow(missing_docs)]

pub mod collections;
pub mod entry;
pub mod error;
pub mod query;
pub mod responses;

// Intentionally curated re-exports for downstream consumers.
pub use collections::{
    CreateFavoriteRequest, CreatePlaylistRequest, Favorite, Playlist,
};
pub use entry::{Entry, SearchHit};
pub use error::{ErrorKind, ModelError, Result as ModelResult};
pub use query::{BrowseQuery, FilterType, SearchQuery, SortBy, SortOrder};
pub use responses::{
    Breadcrumb, BrowseResponse, ErrorBody, ErrorDetail, SearchResponse,
    ThumbnailResponse, VideoInfo,
};

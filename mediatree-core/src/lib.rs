//! # Mediatree Core
//!
//! Server-side domain library for the mediatree media browser.
//!
//! - [`sandbox`]: resolves client paths against the single media root. Every
//!   other module goes through it before touching the file system.
//! - [`catalog`]: lists, classifies, filters and sorts one directory.
//! - [`search`]: recursive name search over the whole tree.
//! - [`classify`]: video allow-list, mime types and OS artifact names.
//! - [`collections`]: JSON-backed playlists and favorites.
//! - [`thumbnails`], [`video_info`]: small per-file lookups.
//! - [`api`]: route templates shared with the player.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediatree_core::{DirectoryCatalog, MediaClassifier, MediaRoot};
//! use mediatree_model::{BrowseQuery, FilterType};
//!
//! async fn list_videos() -> mediatree_core::Result<()> {
//!     let root = MediaRoot::new("/srv/media")?;
//!     let catalog = DirectoryCatalog::new(root, Arc::new(MediaClassifier::default()));
//!     let listing = catalog
//!         .browse(&BrowseQuery::at("movies").filtered(FilterType::Video))
//!         .await?;
//!     println!("{} entries", listing.items.len());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod catalog;
pub mod classify;
pub mod collections;
pub mod error;
pub mod sandbox;
pub mod search;
pub mod thumbnails;
pub mod video_info;

pub use catalog::{DirectoryCatalog, sort_entries};
pub use classify::{DEFAULT_VIDEO_FILE_EXTENSIONS, MediaClassifier};
pub use collections::CollectionsStore;
pub use error::{MediaError, Result};
pub use sandbox::{MediaRoot, SandboxedPath};
pub use search::TreeSearch;

//! Listing of a single directory: classify, filter and sort its children.

use std::cmp::Ordering;
use std::sync::Arc;

use mediatree_model::{BrowseQuery, BrowseResponse, Entry, SortBy, SortOrder};
use tracing::{debug, instrument};

use crate::classify::MediaClassifier;
use crate::error::{MediaError, Result};
use crate::sandbox::{MediaRoot, SandboxedPath};

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: MediaRoot,
    classifier: Arc<MediaClassifier>,
}

impl DirectoryCatalog {
    pub fn new(root: MediaRoot, classifier: Arc<MediaClassifier>) -> Self {
        Self { root, classifier }
    }

    pub fn root(&self) -> &MediaRoot {
        &self.root
    }

    /// Resolves `query.path` and lists it.
    pub async fn browse(&self, query: &BrowseQuery) -> Result<BrowseResponse> {
        let dir = self.root.resolve_async(&query.path).await?;
        self.list(&dir, query).await
    }

    /// Lists the immediate children of an already sandboxed directory.
    #[instrument(skip(self, dir, query), fields(path = %dir.relative()))]
    pub async fn list(
        &self,
        dir: &SandboxedPath,
        query: &BrowseQuery,
    ) -> Result<BrowseResponse> {
        let not_found =
            || MediaError::NotFound(format!("directory '{}'", dir.relative()));

        let metadata = tokio::fs::metadata(dir.absolute())
            .await
            .map_err(|_| not_found())?;
        if !metadata.is_dir() {
            return Err(not_found());
        }

        let mut reader = tokio::fs::read_dir(dir.absolute())
            .await
            .map_err(|_| not_found())?;

        let needle = query.search_term.trim().to_lowercase();
        let mut items = Vec::new();

        while let Some(child) = reader.next_entry().await? {
            let Some(name) = child.file_name().to_str().map(str::to_owned) else {
                debug!("skipping non UTF-8 name");
                continue;
            };
            if self.classifier.is_metadata_artifact(&name) {
                continue;
            }
            if !needle.is_empty() && !name.to_lowercase().contains(&needle) {
                continue;
            }

            let file_type = match child.file_type().await {
                Ok(file_type) => file_type,
                Err(err) => {
                    debug!(name = %name, error = %err, "cannot stat entry");
                    continue;
                }
            };

            // Symlinks are classified by their target and dropped when the
            // target dangles or leaves the root.
            if file_type.is_symlink()
                && !self.root.contains_async(&child.path()).await
            {
                debug!(name = %name, "omitting symlink outside media root");
                continue;
            }

            let metadata = match tokio::fs::metadata(child.path()).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    debug!(name = %name, error = %err, "cannot read metadata");
                    continue;
                }
            };

            let entry = self.classifier.entry(
                &name,
                dir.child_relative(&name),
                &metadata,
            );
            if query.filter_type.admits(entry.is_directory, entry.is_video) {
                items.push(entry);
            }
        }

        sort_entries(&mut items, query.sort_by, query.sort_order);

        Ok(BrowseResponse {
            current_path: dir.relative().to_string(),
            parent_path: dir.parent_relative(),
            breadcrumbs: dir.breadcrumbs(),
            items,
        })
    }
}

/// Stable sort on one key. Descending flips the comparator, so entries with
/// equal keys keep their enumeration order in both directions.
pub fn sort_entries(items: &mut [Entry], by: SortBy, order: SortOrder) {
    let compare = |a: &Entry, b: &Entry| -> Ordering {
        match by {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Size => a.size.cmp(&b.size),
            SortBy::Date => a.modified_at.cmp(&b.modified_at),
        }
    };

    match order {
        SortOrder::Asc => items.sort_by(compare),
        SortOrder::Desc => items.sort_by(|a, b| compare(b, a)),
    }
}

//! Whole-tree search over the media root.

use std::sync::Arc;

use mediatree_model::{Entry, FilterType, SearchHit, SearchResponse};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::classify::MediaClassifier;
use crate::error::{MediaError, Result};
use crate::sandbox::MediaRoot;

pub const DEFAULT_MAX_TERM_LENGTH: usize = 256;

/// Recursive, case-insensitive name search.
///
/// Results come back in traversal order with no ranking. Symlinks are
/// followed only when they resolve inside the root; every linked entry is
/// re-validated through [`MediaRoot::resolve`] before the walker descends.
#[derive(Debug, Clone)]
pub struct TreeSearch {
    root: MediaRoot,
    classifier: Arc<MediaClassifier>,
    max_term_length: usize,
}

impl TreeSearch {
    pub fn new(root: MediaRoot, classifier: Arc<MediaClassifier>) -> Self {
        Self {
            root,
            classifier,
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }

    pub fn with_max_term_length(mut self, max: usize) -> Self {
        self.max_term_length = max;
        self
    }

    /// Rejects empty and over-long terms.
    pub fn validate_term<'a>(&self, term: &'a str) -> Result<&'a str> {
        let term = term.trim();
        if term.is_empty() {
            return Err(MediaError::Validation(
                "search term must not be empty".to_string(),
            ));
        }
        if term.chars().count() > self.max_term_length {
            return Err(MediaError::Validation(format!(
                "search term exceeds {} characters",
                self.max_term_length
            )));
        }
        Ok(term)
    }

    /// Blocking walk; run it on a blocking thread from async code.
    pub fn search(&self, term: &str, filter: FilterType) -> Result<SearchResponse> {
        let needle = self.validate_term(term)?.to_lowercase();

        let walker = WalkDir::new(self.root.path())
            .follow_links(true)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| self.admissible(entry));

        let mut results = Vec::new();
        let mut skipped = 0usize;

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    // Loops and unreadable directories end up here.
                    debug!(error = %err, "skipping unreadable search entry");
                    skipped += 1;
                    continue;
                }
            };

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.to_lowercase().contains(&needle) {
                continue;
            }

            match self.hit_for(&entry, name) {
                Some(hit) if filter.admits(hit.entry.is_directory, hit.entry.is_video) => {
                    results.push(hit);
                }
                Some(_) => {}
                None => skipped += 1,
            }
        }

        info!(
            term = %needle,
            filter = filter.as_str(),
            results = results.len(),
            skipped,
            "search complete"
        );

        Ok(SearchResponse::new(results))
    }

    /// Decides whether the walker may yield (and descend into) an entry.
    fn admissible(&self, entry: &DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        if self.classifier.is_metadata_artifact(name) {
            return false;
        }
        if !entry.path_is_symlink() {
            return true;
        }

        let Some(relative) = self.root.relative_of(entry.path()) else {
            return false;
        };
        match self.root.resolve(&relative) {
            Ok(_) => true,
            Err(err) => {
                warn!(path = %relative, error = %err, "search not following symlink");
                false
            }
        }
    }

    fn hit_for(&self, entry: &DirEntry, name: &str) -> Option<SearchHit> {
        let relative = self.root.relative_of(entry.path())?;
        let metadata = entry.metadata().ok()?;
        let item: Entry = self.classifier.entry(name, relative.clone(), &metadata);
        Some(SearchHit {
            entry: item,
            relative_path: relative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> TreeSearch {
        let root = MediaRoot::new(dir.path()).unwrap();
        TreeSearch::new(root, Arc::new(MediaClassifier::default()))
    }

    #[test]
    fn empty_and_long_terms_are_rejected() {
        let dir = TempDir::new().unwrap();
        let search = engine(&dir).with_max_term_length(4);
        assert!(matches!(
            search.search("   ", FilterType::All),
            Err(MediaError::Validation(_))
        ));
        assert!(matches!(
            search.search("abcde", FilterType::All),
            Err(MediaError::Validation(_))
        ));
        assert!(search.search("abcd", FilterType::All).is_ok());
    }

    #[test]
    fn finds_nested_matches_with_relative_path() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("movies")).unwrap();
        std::fs::write(dir.path().join("movies/clip2.mp4"), b"data").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let response = engine(&dir).search("CLIP", FilterType::All).unwrap();
        assert_eq!(response.total_results, 1);
        let hit = &response.results[0];
        assert_eq!(hit.relative_path, "movies/clip2.mp4");
        assert_eq!(hit.entry.path, "movies/clip2.mp4");
        assert!(hit.entry.is_video);
        assert_eq!(hit.entry.size, 4);
    }

    #[test]
    fn applies_type_filter_and_hides_artifacts() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("clips")).unwrap();
        std::fs::write(dir.path().join("clips/clip.mkv"), b"v").unwrap();
        std::fs::write(dir.path().join("clips/clip.srt"), b"s").unwrap();
        std::fs::write(dir.path().join("clips/._clip.mkv"), b"a").unwrap();

        let search = engine(&dir);
        let all = search.search("clip", FilterType::All).unwrap();
        assert_eq!(all.total_results, 3);

        let others = search.search("clip", FilterType::Other).unwrap();
        let names: Vec<_> =
            others.results.iter().map(|h| h.entry.name.as_str()).collect();
        assert_eq!(names, vec!["clip.srt"]);

        let dirs = search.search("clip", FilterType::Directory).unwrap();
        assert_eq!(dirs.results.len(), 1);
        assert!(dirs.results[0].entry.is_directory);
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinks_out_of_root() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret-clip.mp4"), b"x").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape"))
            .unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"x").unwrap();

        let response = engine(&dir).search("clip", FilterType::All).unwrap();
        let paths: Vec<_> =
            response.results.iter().map(|h| h.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["clip.mp4"]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinks_inside_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("real/clip.mp4"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias"))
            .unwrap();

        let response = engine(&dir).search("clip", FilterType::Video).unwrap();
        let mut paths: Vec<_> =
            response.results.iter().map(|h| h.relative_path.clone()).collect();
        paths.sort();
        assert_eq!(paths, vec!["alias/clip.mp4", "real/clip.mp4"]);
    }
}

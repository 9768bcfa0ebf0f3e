//! Path resolution against the single media root.
//!
//! Every component that touches the file system goes through
//! [`MediaRoot::resolve`] first. The resolver is stateless apart from the
//! canonical root it was built with.

use std::path::{Component, Path, PathBuf};

use mediatree_model::Breadcrumb;
use tracing::{debug, warn};

use crate::error::{MediaError, Result};

/// Canonicalised top-level directory all operations are sandboxed to.
#[derive(Debug, Clone)]
pub struct MediaRoot {
    root: PathBuf,
}

/// A path proven to resolve inside the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxedPath {
    absolute: PathBuf,
    relative: String,
}

impl MediaRoot {
    /// Canonicalises `root` and checks that it is a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root).map_err(|err| {
            MediaError::NotFound(format!(
                "media root {} is not accessible: {err}",
                root.display()
            ))
        })?;

        if !canonical.is_dir() {
            return Err(MediaError::NotFound(format!(
                "media root {} is not a directory",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Turns a client supplied relative path into a sandboxed location.
    ///
    /// Rejects rooted input, drive prefixes and any `..` segment outright.
    /// `.` and empty segments collapse, and `\` counts as a separator. When
    /// the target (or its nearest existing ancestor) exists it is
    /// canonicalised so that symlinks are checked against the root too.
    pub fn resolve(&self, user_path: &str) -> Result<SandboxedPath> {
        let segments = match normalize_segments(user_path) {
            Some(segments) => segments,
            None => {
                warn!(attempted = %user_path, "rejected path outside media root");
                return Err(MediaError::AccessDenied);
            }
        };

        let mut absolute = self.root.clone();
        for segment in &segments {
            absolute.push(segment);
        }

        if let Err(err) = self.ensure_contained(&absolute) {
            if matches!(err, MediaError::AccessDenied) {
                warn!(attempted = %user_path, "symlink escapes media root");
            }
            return Err(err);
        }

        Ok(SandboxedPath {
            absolute,
            relative: segments.join("/"),
        })
    }

    /// [`resolve`](Self::resolve) on the blocking pool, for async callers.
    pub async fn resolve_async(&self, user_path: &str) -> Result<SandboxedPath> {
        let root = self.clone();
        let user_path = user_path.to_string();
        tokio::task::spawn_blocking(move || root.resolve(&user_path))
            .await
            .map_err(|err| MediaError::Internal(err.to_string()))?
    }

    /// True when `candidate` canonicalises to a location inside the root.
    pub fn contains(&self, candidate: &Path) -> bool {
        std::fs::canonicalize(candidate)
            .map(|real| real.starts_with(&self.root))
            .unwrap_or(false)
    }

    pub async fn contains_async(&self, candidate: &Path) -> bool {
        tokio::fs::canonicalize(candidate)
            .await
            .map(|real| real.starts_with(&self.root))
            .unwrap_or(false)
    }

    /// Root-relative, forward-slash form of a path found under the root.
    ///
    /// Returns `None` for paths outside the root or with non UTF-8 names,
    /// since those could not be resolved back by a client.
    pub fn relative_of(&self, path: &Path) -> Option<String> {
        let stripped = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in stripped.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(parts.join("/"))
    }

    fn ensure_contained(&self, candidate: &Path) -> Result<()> {
        let mut probe = candidate;
        loop {
            match std::fs::canonicalize(probe) {
                Ok(real) if real.starts_with(&self.root) => return Ok(()),
                Ok(_) => return Err(MediaError::AccessDenied),
                Err(err)
                    if err.kind() == std::io::ErrorKind::NotFound
                        && std::fs::symlink_metadata(probe).is_err() =>
                {
                    match probe.parent() {
                        Some(parent) if parent.starts_with(&self.root) => {
                            probe = parent;
                        }
                        _ => return Ok(()),
                    }
                }
                Err(err) => {
                    debug!(error = %err, "cannot canonicalise sandboxed path");
                    return Err(MediaError::NotFound(
                        "path is not accessible".to_string(),
                    ));
                }
            }
        }
    }
}

/// Splits user input into clean segments, or `None` if it must be denied.
fn normalize_segments(user_path: &str) -> Option<Vec<String>> {
    if user_path.contains('\0') {
        return None;
    }

    let unified = user_path.replace('\\', "/");
    if unified.starts_with('/') || Path::new(user_path).has_root() {
        return None;
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if segments.is_empty() && is_drive_prefix(s) => return None,
            s => segments.push(s.to_string()),
        }
    }
    Some(segments)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl SandboxedPath {
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Root-relative path, empty for the root itself.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.relative.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Relative path one level up; empty at (or directly under) the root.
    pub fn parent_relative(&self) -> String {
        match self.relative.rfind('/') {
            Some(idx) => self.relative[..idx].to_string(),
            None => String::new(),
        }
    }

    /// Root-relative path of a child named `name`.
    pub fn child_relative(&self, name: &str) -> String {
        if self.relative.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.relative)
        }
    }

    /// Clickable trail from the root down to this location.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "Home".to_string(),
            relative_path: String::new(),
        }];
        let mut current = String::new();
        for segment in self.relative.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            crumbs.push(Breadcrumb {
                label: segment.to_string(),
                relative_path: current.clone(),
            });
        }
        crumbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root() -> (TempDir, MediaRoot) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("movies/action")).unwrap();
        std::fs::write(dir.path().join("movies/clip.mp4"), b"x").unwrap();
        let root = MediaRoot::new(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn empty_path_is_root() {
        let (_dir, root) = root();
        let resolved = root.resolve("").unwrap();
        assert!(resolved.is_root());
        assert_eq!(resolved.absolute(), root.path());
        assert_eq!(resolved.parent_relative(), "");
    }

    #[test]
    fn dot_and_empty_segments_collapse() {
        let (_dir, root) = root();
        let resolved = root.resolve("./movies//action/.").unwrap();
        assert_eq!(resolved.relative(), "movies/action");
        assert_eq!(resolved.parent_relative(), "movies");
    }

    #[test]
    fn backslash_is_a_separator() {
        let (_dir, root) = root();
        let resolved = root.resolve("movies\\action").unwrap();
        assert_eq!(resolved.relative(), "movies/action");
    }

    #[test]
    fn traversal_and_rooted_input_are_denied() {
        let (_dir, root) = root();
        for input in [
            "..",
            "../etc/passwd",
            "movies/../../etc",
            "movies/../clip.mp4",
            "/etc/passwd",
            "\\windows",
            "C:\\Windows",
            "movies/\0",
        ] {
            assert!(
                matches!(root.resolve(input), Err(MediaError::AccessDenied)),
                "{input:?} should be denied"
            );
        }
    }

    #[test]
    fn denial_message_does_not_leak_paths() {
        let (_dir, root) = root();
        let err = root.resolve("../secret").unwrap_err();
        assert_eq!(err.to_string(), "Access denied");
    }

    #[test]
    fn missing_target_still_resolves_inside_root() {
        let (_dir, root) = root();
        let resolved = root.resolve("movies/nope/deeper.mp4").unwrap();
        assert!(resolved.absolute().starts_with(root.path()));
        assert!(!resolved.absolute().exists());
    }

    #[test]
    fn breadcrumbs_start_at_root() {
        let (_dir, root) = root();
        let crumbs = root.resolve("movies/action").unwrap().breadcrumbs();
        let paths: Vec<_> =
            crumbs.iter().map(|c| c.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["", "movies", "movies/action"]);
        assert_eq!(crumbs[2].label, "action");
    }

    #[test]
    fn relative_of_round_trips() {
        let (_dir, root) = root();
        let abs = root.path().join("movies").join("clip.mp4");
        assert_eq!(root.relative_of(&abs).as_deref(), Some("movies/clip.mp4"));
        assert_eq!(root.relative_of(Path::new("/elsewhere")), None);
    }

    #[cfg(unix)]
    #[test]
    fn sibling_prefix_directory_is_not_inside() {
        let parent = TempDir::new().unwrap();
        let media = parent.path().join("media");
        let evil = parent.path().join("media-evil");
        std::fs::create_dir_all(&media).unwrap();
        std::fs::create_dir_all(&evil).unwrap();
        std::fs::write(evil.join("loot.mp4"), b"x").unwrap();
        std::os::unix::fs::symlink(&evil, media.join("link")).unwrap();

        let root = MediaRoot::new(&media).unwrap();
        assert!(matches!(
            root.resolve("link/loot.mp4"),
            Err(MediaError::AccessDenied)
        ));
        assert!(!root.contains(&evil));
    }

    #[tokio::test]
    async fn async_resolution_matches_blocking() {
        let (dir, root) = root();
        let resolved = root.resolve_async("./movies/clip.mp4").await.unwrap();
        assert_eq!(resolved, root.resolve("movies/clip.mp4").unwrap());
        assert!(matches!(
            root.resolve_async("movies/../../etc").await,
            Err(MediaError::AccessDenied)
        ));
        assert!(root.contains_async(&dir.path().join("movies")).await);
        assert!(!root.contains_async(Path::new("/")).await);
    }

    #[cfg(unix)]
    #[test]
    fn in_root_symlink_is_allowed() {
        let (dir, root) = root();
        std::os::unix::fs::symlink(
            dir.path().join("movies/action"),
            dir.path().join("shortcut"),
        )
        .unwrap();
        let resolved = root.resolve("shortcut").unwrap();
        assert_eq!(resolved.relative(), "shortcut");
    }
}

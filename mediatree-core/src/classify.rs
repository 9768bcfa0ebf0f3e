use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Utc};
use mediatree_model::Entry;

/// Extensions treated as video when no configuration overrides them.
pub const DEFAULT_VIDEO_FILE_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "webm", "m4v", "flv", "wmv", "3gp", "ogv",
    "mpg", "mpeg",
];

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const DEFAULT_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("flv", "video/x-flv"),
    ("wmv", "video/x-ms-wmv"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// Names operating systems drop into media folders.
const OS_METADATA_NAMES: &[&str] = &[
    ".DS_Store",
    ".Spotlight-V100",
    ".Trashes",
    ".fseventsd",
    ".TemporaryItems",
    "Thumbs.db",
    "desktop.ini",
    "$RECYCLE.BIN",
    "System Volume Information",
    "@eaDir",
];

/// Decides whether a name is a video, which mime type it has and whether
/// it is an OS metadata artifact that should never be shown.
#[derive(Debug, Clone)]
pub struct MediaClassifier {
    video_extensions: HashSet<String>,
    mime_types: HashMap<String, String>,
    hidden_names: HashSet<String>,
}

impl Default for MediaClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_VIDEO_FILE_EXTENSIONS.iter().map(|ext| ext.to_string()),
            HashMap::new(),
            Vec::new(),
        )
    }
}

impl MediaClassifier {
    /// Builds a classifier; `mime_overrides` win over the built-in table and
    /// `extra_hidden` extends the built-in OS metadata names.
    pub fn new(
        video_extensions: impl IntoIterator<Item = String>,
        mime_overrides: HashMap<String, String>,
        extra_hidden: impl IntoIterator<Item = String>,
    ) -> Self {
        let video_extensions = video_extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        let mut mime_types: HashMap<String, String> = DEFAULT_MIME_TYPES
            .iter()
            .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
            .collect();
        for (ext, mime) in mime_overrides {
            mime_types.insert(ext.trim_start_matches('.').to_ascii_lowercase(), mime);
        }

        let hidden_names = OS_METADATA_NAMES
            .iter()
            .map(|name| name.to_string())
            .chain(extra_hidden)
            .collect();

        Self {
            video_extensions,
            mime_types,
            hidden_names,
        }
    }

    /// Lowercased extension without the dot, empty if there is none.
    pub fn extension_of(name: &str) -> String {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn is_video_extension(&self, extension: &str) -> bool {
        self.video_extensions.contains(extension)
    }

    pub fn is_video_name(&self, name: &str) -> bool {
        self.is_video_extension(&Self::extension_of(name))
    }

    pub fn mime_type(&self, extension: &str) -> &str {
        self.mime_types
            .get(extension)
            .map(String::as_str)
            .unwrap_or(FALLBACK_MIME_TYPE)
    }

    /// AppleDouble files (`._*`) and well known OS metadata names.
    pub fn is_metadata_artifact(&self, name: &str) -> bool {
        name.starts_with("._") || self.hidden_names.contains(name)
    }

    /// Builds the client facing entry for a node whose metadata has already
    /// been read (following symlinks).
    pub fn entry(&self, name: &str, relative: String, metadata: &Metadata) -> Entry {
        let is_directory = metadata.is_dir();
        let extension = if is_directory {
            String::new()
        } else {
            Self::extension_of(name)
        };
        let is_video = !is_directory && self.is_video_extension(&extension);
        let modified_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();

        Entry {
            name: name.to_string(),
            path: relative,
            is_directory,
            is_video,
            size: if is_directory { 0 } else { metadata.len() },
            modified_at,
            extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allow_list_is_case_insensitive() {
        let classifier = MediaClassifier::default();
        assert!(classifier.is_video_name("clip.MP4"));
        assert!(classifier.is_video_name("old.3gp"));
        assert!(!classifier.is_video_name("notes.txt"));
        assert!(!classifier.is_video_name("mp4"));
    }

    #[test]
    fn configured_extensions_replace_defaults() {
        let classifier = MediaClassifier::new(
            vec![".TS".to_string(), "m2ts".to_string()],
            HashMap::new(),
            Vec::new(),
        );
        assert!(classifier.is_video_name("show.ts"));
        assert!(!classifier.is_video_name("movie.mp4"));
    }

    #[test]
    fn unknown_mime_falls_back() {
        let mut overrides = HashMap::new();
        overrides.insert("mkv".to_string(), "video/webm".to_string());
        let classifier = MediaClassifier::new(
            vec!["mkv".to_string(), "xyz".to_string()],
            overrides,
            Vec::new(),
        );
        assert_eq!(classifier.mime_type("mkv"), "video/webm");
        assert_eq!(classifier.mime_type("mp4"), "video/mp4");
        assert_eq!(classifier.mime_type("xyz"), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn metadata_artifacts() {
        let classifier = MediaClassifier::new(
            DEFAULT_VIDEO_FILE_EXTENSIONS.iter().map(|e| e.to_string()),
            HashMap::new(),
            vec!["lost+found".to_string()],
        );
        assert!(classifier.is_metadata_artifact("._clip.mp4"));
        assert!(classifier.is_metadata_artifact(".DS_Store"));
        assert!(classifier.is_metadata_artifact("Thumbs.db"));
        assert!(classifier.is_metadata_artifact("lost+found"));
        assert!(!classifier.is_metadata_artifact("clip.mp4"));
        assert!(!classifier.is_metadata_artifact(".hidden-but-normal"));
    }
}

use mediatree_model::VideoInfo;

use crate::classify::MediaClassifier;
use crate::error::{MediaError, Result};
use crate::sandbox::SandboxedPath;

/// Metadata for a sandboxed video file.
///
/// Directories and missing paths are `NotFound`; existing files that are not
/// videos are a validation error.
pub async fn video_info(
    target: &SandboxedPath,
    classifier: &MediaClassifier,
) -> Result<VideoInfo> {
    let metadata = tokio::fs::metadata(target.absolute())
        .await
        .map_err(|_| MediaError::NotFound(format!("video '{}'", target.relative())))?;

    let name = target
        .file_name()
        .filter(|_| metadata.is_file())
        .ok_or_else(|| MediaError::NotFound(format!("video '{}'", target.relative())))?;

    let entry = classifier.entry(name, target.relative().to_string(), &metadata);
    if !entry.is_video {
        return Err(MediaError::Validation(format!(
            "'{name}' is not a supported video file"
        )));
    }

    Ok(VideoInfo {
        mime_type: classifier.mime_type(&entry.extension).to_string(),
        name: entry.name,
        size: entry.size,
        modified: entry.modified_at,
        extension: entry.extension,
        path: entry.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::MediaRoot;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reports_video_metadata() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("movies")).unwrap();
        std::fs::write(dir.path().join("movies/Clip.MKV"), vec![0u8; 2048]).unwrap();
        let root = MediaRoot::new(dir.path()).unwrap();
        let classifier = MediaClassifier::default();

        let info = video_info(&root.resolve("movies/Clip.MKV").unwrap(), &classifier)
            .await
            .unwrap();
        assert_eq!(info.name, "Clip.MKV");
        assert_eq!(info.size, 2048);
        assert_eq!(info.extension, "mkv");
        assert_eq!(info.mime_type, "video/x-matroska");
        assert_eq!(info.path, "movies/Clip.MKV");
    }

    #[tokio::test]
    async fn rejects_directories_and_non_videos() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("movies")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();
        let root = MediaRoot::new(dir.path()).unwrap();
        let classifier = MediaClassifier::default();

        let dir_err = video_info(&root.resolve("movies").unwrap(), &classifier)
            .await
            .unwrap_err();
        assert!(matches!(dir_err, MediaError::NotFound(_)));

        let txt_err = video_info(&root.resolve("notes.txt").unwrap(), &classifier)
            .await
            .unwrap_err();
        assert!(matches!(txt_err, MediaError::Validation(_)));

        let missing = video_info(&root.resolve("gone.mp4").unwrap(), &classifier)
            .await
            .unwrap_err();
        assert!(matches!(missing, MediaError::NotFound(_)));
    }
}

use std::path::Path;

use url::Url;

use crate::api::routes::v1;
use crate::error::{MediaError, Result};
use crate::sandbox::{MediaRoot, SandboxedPath};

/// Sidecar image extensions, in lookup order.
pub const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Looks for `<stem>.<ext>` next to the video and returns a media URL for it.
///
/// A missing sidecar is not an error; the caller simply omits the URL.
pub fn find_thumbnail(
    root: &MediaRoot,
    video: &SandboxedPath,
) -> Result<Option<String>> {
    let Some(stem) = Path::new(video.relative())
        .file_stem()
        .and_then(|stem| stem.to_str())
    else {
        return Ok(None);
    };

    let parent = video.parent_relative();
    for ext in THUMBNAIL_EXTENSIONS {
        let candidate_name = format!("{stem}.{ext}");
        let candidate = if parent.is_empty() {
            candidate_name
        } else {
            format!("{parent}/{candidate_name}")
        };

        let resolved = match root.resolve(&candidate) {
            Ok(resolved) => resolved,
            Err(MediaError::AccessDenied | MediaError::NotFound(_)) => continue,
            Err(err) => return Err(err),
        };
        if resolved.absolute().is_file() {
            return media_url(resolved.relative()).map(Some);
        }
    }

    Ok(None)
}

/// Percent-encoded `/api/v1/media/...` URL for a root-relative path.
pub fn media_url(relative: &str) -> Result<String> {
    let mut url = Url::parse("http://localhost")
        .map_err(|err| MediaError::Internal(err.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| MediaError::Internal("cannot-be-a-base url".to_string()))?;
        segments.clear();
        segments.extend(v1::media::PREFIX.trim_start_matches('/').split('/'));
        segments.extend(relative.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url.path().to_string())
}

use axum::{
    Json,
    body::Body,
    extract::{Path, Query, Request, State, rejection::QueryRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use mediatree_core::{MediaClassifier, thumbnails, video_info};
use mediatree_model::{ThumbnailResponse, VideoInfo};

use super::PathQuery;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// `GET /api/v1/video-info?path`
pub async fn video_info_handler(
    State(state): State<AppState>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> AppResult<Json<VideoInfo>> {
    let Query(PathQuery { path }) = query?;
    let target = state.root.resolve_async(&path).await?;
    let info = video_info::video_info(&target, &state.classifier).await?;
    Ok(Json(info))
}

/// `GET /api/v1/thumbnail?path`; `{}` when no sidecar image exists.
pub async fn thumbnail_handler(
    State(state): State<AppState>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> AppResult<Json<ThumbnailResponse>> {
    let Query(PathQuery { path }) = query?;
    let root = state.root.clone();
    let thumbnail_url = tokio::task::spawn_blocking(move || {
        let target = root.resolve(&path)?;
        thumbnails::find_thumbnail(&root, &target)
    })
    .await??;
    Ok(Json(ThumbnailResponse { thumbnail_url }))
}

/// `GET /api/v1/media/{*path}`: raw bytes with Range support.
///
/// The wildcard goes through the same resolver as browse and search, and
/// only regular files are served.
pub async fn serve_media_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> AppResult<Response> {
    let target = state.root.resolve_async(&path).await?;

    let metadata = tokio::fs::metadata(target.absolute())
        .await
        .map_err(|_| AppError::not_found(format!("Not found: {}", target.relative())))?;
    if !metadata.is_file() {
        return Err(AppError::not_found(format!(
            "Not found: {}",
            target.relative()
        )));
    }

    debug!(path = %target.relative(), bytes = metadata.len(), "serving media");

    let mut response = match ServeFile::new(target.absolute()).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if response.status().is_success() {
        let extension = MediaClassifier::extension_of(target.relative());
        let mime = state.classifier.mime_type(&extension);
        if let Ok(value) = HeaderValue::from_str(mime) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }

    Ok(response.into_response())
}

use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use mediatree_model::{
    CreateFavoriteRequest, CreatePlaylistRequest, Favorite, Playlist,
};

use crate::infra::{app_state::AppState, errors::AppResult};

// Mutations rewrite the store file synchronously, so they run on the
// blocking pool.

pub async fn list_playlists_handler(
    State(state): State<AppState>,
) -> Json<Vec<Playlist>> {
    Json(state.collections.playlists())
}

pub async fn create_playlist_handler(
    State(state): State<AppState>,
    body: Result<Json<CreatePlaylistRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Playlist>)> {
    let Json(request) = body?;
    let store = state.collections.clone();
    let playlist =
        tokio::task::spawn_blocking(move || store.create_playlist(request))
            .await??;
    info!(id = %playlist.id, videos = playlist.videos.len(), "playlist created");
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn delete_playlist_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let store = state.collections.clone();
    tokio::task::spawn_blocking(move || store.delete_playlist(id)).await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_favorites_handler(
    State(state): State<AppState>,
) -> Json<Vec<Favorite>> {
    Json(state.collections.favorites())
}

pub async fn create_favorite_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Favorite>)> {
    let Json(request) = body?;
    let store = state.collections.clone();
    let favorite =
        tokio::task::spawn_blocking(move || store.create_favorite(request))
            .await??;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn delete_favorite_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let store = state.collections.clone();
    tokio::task::spawn_blocking(move || store.delete_favorite(id)).await??;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Router,
    routing::{delete, get},
};

use mediatree_core::api::routes::v1;

use crate::{
    AppState,
    handlers::{browse, collections, media, search},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Navigation
        .route(v1::BROWSE, get(browse::browse_handler))
        .route(v1::SEARCH, get(search::search_handler))
        // Per-file lookups and bytes
        .route(v1::VIDEO_INFO, get(media::video_info_handler))
        .route(v1::THUMBNAIL, get(media::thumbnail_handler))
        .route(v1::media::FILE, get(media::serve_media_handler))
        // Collections
        .route(
            v1::playlists::COLLECTION,
            get(collections::list_playlists_handler)
                .post(collections::create_playlist_handler),
        )
        .route(
            v1::playlists::ITEM,
            delete(collections::delete_playlist_handler),
        )
        .route(
            v1::favorites::COLLECTION,
            get(collections::list_favorites_handler)
                .post(collections::create_favorite_handler),
        )
        .route(
            v1::favorites::ITEM,
            delete(collections::delete_favorite_handler),
        )
}

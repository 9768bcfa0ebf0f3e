//! API service trait
//!
//! Abstraction over the mediatree HTTP surface so library and session
//! logic can be exercised against in-process fakes.

use std::fmt::Debug;

use async_trait::async_trait;
use mediatree_model::{
    BrowseQuery, BrowseResponse, CreateFavoriteRequest, CreatePlaylistRequest,
    Favorite, Playlist, SearchQuery, SearchResponse, VideoInfo,
};
use url::Url;
use uuid::Uuid;

use crate::error::PlayerResult;

#[async_trait]
pub trait ApiService: Send + Sync + Debug {
    /// Origin media URLs are resolved against.
    fn base_url(&self) -> &Url;

    async fn browse(&self, query: &BrowseQuery) -> PlayerResult<BrowseResponse>;

    async fn search(&self, query: &SearchQuery) -> PlayerResult<SearchResponse>;

    async fn video_info(&self, path: &str) -> PlayerResult<VideoInfo>;

    /// `None` when the server has no thumbnail; that is not an error.
    async fn thumbnail(&self, path: &str) -> PlayerResult<Option<String>>;

    // === Collections ===

    async fn list_playlists(&self) -> PlayerResult<Vec<Playlist>>;

    async fn create_playlist(
        &self,
        request: &CreatePlaylistRequest,
    ) -> PlayerResult<Playlist>;

    async fn delete_playlist(&self, id: Uuid) -> PlayerResult<()>;

    async fn list_favorites(&self) -> PlayerResult<Vec<Favorite>>;

    async fn create_favorite(
        &self,
        request: &CreateFavoriteRequest,
    ) -> PlayerResult<Favorite>;

    async fn delete_favorite(&self, id: Uuid) -> PlayerResult<()>;
}

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use mediatree_core::api::routes::{utils::replace_param, v1};
use mediatree_model::{
    BrowseQuery, BrowseResponse, CreateFavoriteRequest, CreatePlaylistRequest,
    ErrorBody, Favorite, Playlist, SearchQuery, SearchResponse,
    ThumbnailResponse, VideoInfo,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::{
    error::{PlayerError, PlayerResult},
    infra::services::ApiService,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a mediatree server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

#[derive(serde::Serialize)]
struct PathParam<'a> {
    path: &'a str,
}

impl ApiClient {
    /// Accepts `localhost:3000` as well as full URLs; a missing scheme
    /// becomes `http://`.
    pub fn new(base_url: &str) -> PlayerResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let with_scheme = if trimmed.starts_with("http://")
            || trimmed.starts_with("https://")
        {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
        if with_scheme != base_url {
            warn!(
                "[ApiClient] Normalized base URL from '{}' to '{}'",
                base_url, with_scheme
            );
        }

        let base_url = Url::parse(&with_scheme).map_err(|err| {
            PlayerError::validation(format!("invalid server URL: {err}"))
        })?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        info!("[ApiClient] Using server {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn build_url(&self, route: &str) -> PlayerResult<Url> {
        self.base_url
            .join(route)
            .map_err(|err| PlayerError::validation(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &(impl serde::Serialize + Sync + ?Sized),
    ) -> PlayerResult<T> {
        let request = self.client.get(self.build_url(route)?).query(query);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> PlayerResult<T> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn execute_empty(&self, request: RequestBuilder) -> PlayerResult<()> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Maps a failed response back into the shared error taxonomy, preferring
/// the kind the server put in the body.
async fn error_from_response(response: Response) -> PlayerError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
        return PlayerError::from_kind(body.error.kind, body.error.message);
    }
    error_from_status(status, text)
}

pub(crate) fn error_from_status(status: StatusCode, text: String) -> PlayerError {
    match status {
        StatusCode::FORBIDDEN => PlayerError::AccessDenied,
        StatusCode::NOT_FOUND => PlayerError::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PlayerError::Validation(text)
        }
        status => PlayerError::TransientIo(format!(
            "request failed with status {status}"
        )),
    }
}

#[async_trait]
impl ApiService for ApiClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn browse(&self, query: &BrowseQuery) -> PlayerResult<BrowseResponse> {
        self.get_json(v1::BROWSE, query).await
    }

    async fn search(&self, query: &SearchQuery) -> PlayerResult<SearchResponse> {
        self.get_json(v1::SEARCH, query).await
    }

    async fn video_info(&self, path: &str) -> PlayerResult<VideoInfo> {
        self.get_json(v1::VIDEO_INFO, &PathParam { path }).await
    }

    async fn thumbnail(&self, path: &str) -> PlayerResult<Option<String>> {
        let response: ThumbnailResponse =
            self.get_json(v1::THUMBNAIL, &PathParam { path }).await?;
        Ok(response.thumbnail_url)
    }

    async fn list_playlists(&self) -> PlayerResult<Vec<Playlist>> {
        let request = self.client.get(self.build_url(v1::playlists::COLLECTION)?);
        self.execute(request).await
    }

    async fn create_playlist(
        &self,
        request: &CreatePlaylistRequest,
    ) -> PlayerResult<Playlist> {
        let request = self
            .client
            .post(self.build_url(v1::playlists::COLLECTION)?)
            .json(request);
        self.execute(request).await
    }

    async fn delete_playlist(&self, id: Uuid) -> PlayerResult<()> {
        let route = replace_param(v1::playlists::ITEM, "{id}", id.to_string());
        let request = self.client.delete(self.build_url(&route)?);
        self.execute_empty(request).await
    }

    async fn list_favorites(&self) -> PlayerResult<Vec<Favorite>> {
        let request = self.client.get(self.build_url(v1::favorites::COLLECTION)?);
        self.execute(request).await
    }

    async fn create_favorite(
        &self,
        request: &CreateFavoriteRequest,
    ) -> PlayerResult<Favorite> {
        let request = self
            .client
            .post(self.build_url(v1::favorites::COLLECTION)?)
            .json(request);
        self.execute(request).await
    }

    async fn delete_favorite(&self, id: Uuid) -> PlayerResult<()> {
        let route = replace_param(v1::favorites::ITEM, "{id}", id.to_string());
        let request = self.client.delete(self.build_url(&route)?);
        self.execute_empty(request).await
    }
}

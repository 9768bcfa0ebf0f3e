//! Session context: everything the client holds for one browsing session,
//! constructed at startup and torn down explicitly.

use std::sync::Arc;

use log::info;
use mediatree_model::VideoInfo;
use uuid::Uuid;

use crate::{
    domains::{
        library::LibraryDomain,
        player::{PlaybackController, PlaybackElement},
        progress::{FileProgressStore, ProgressStore},
    },
    error::{PlayerError, PlayerResult},
    infra::{api_client::ApiClient, services::ApiService},
};

#[derive(Debug)]
pub struct Session<E: PlaybackElement, S: ProgressStore> {
    api: Arc<dyn ApiService>,
    library: Arc<LibraryDomain>,
    player: PlaybackController<E, S>,
}

impl<E: PlaybackElement> Session<E, FileProgressStore> {
    /// Connects to `server_url` with resume positions kept in the platform
    /// data directory.
    pub fn connect(server_url: &str, element: E) -> PlayerResult<Self> {
        let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(server_url)?);
        let progress = FileProgressStore::open_default()?;
        Ok(Self::new(api, element, progress))
    }
}

impl<E: PlaybackElement, S: ProgressStore> Session<E, S> {
    pub fn new(api: Arc<dyn ApiService>, element: E, progress: S) -> Self {
        let media_base = api.base_url().clone();
        Self {
            library: Arc::new(LibraryDomain::new(api.clone())),
            player: PlaybackController::new(element, progress, media_base),
            api,
        }
    }

    pub fn api(&self) -> &Arc<dyn ApiService> {
        &self.api
    }

    pub fn library(&self) -> &Arc<LibraryDomain> {
        &self.library
    }

    pub fn player(&self) -> &PlaybackController<E, S> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController<E, S> {
        &mut self.player
    }

    /// Fetches metadata for a video the user picked and loads it. Any
    /// active playlist is abandoned.
    pub async fn open_video(&mut self, path: &str) -> PlayerResult<VideoInfo> {
        let info = self.api.video_info(path).await?;
        self.player.load(&info.path)?;
        Ok(info)
    }

    /// Plays a stored playlist from its first video.
    pub async fn play_playlist(&mut self, id: Uuid) -> PlayerResult<bool> {
        let playlists = self.api.list_playlists().await?;
        let playlist = playlists
            .into_iter()
            .find(|playlist| playlist.id == id)
            .ok_or_else(|| PlayerError::NotFound(format!("playlist {id}")))?;
        info!(
            "[Session] Playing '{}' ({} videos)",
            playlist.name,
            playlist.videos.len()
        );
        self.player.start_playlist(playlist.videos)
    }

    /// Closes the player and makes every saved position durable.
    pub fn teardown(mut self) -> PlayerResult<()> {
        self.player.close();
        self.player.flush()
    }
}

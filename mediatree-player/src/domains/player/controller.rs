use std::{collections::VecDeque, fmt};

use log::{debug, info, warn};
use mediatree_core::thumbnails::media_url;
use mediatree_model::Entry;
use url::Url;

use super::{
    controls::ControlsView,
    element::PlaybackElement,
    messages::{ElementEvent, PlayerEffect, PlayerMessage},
    state::{MediaSource, PlaybackState},
    update::{Transition, reduce},
};
use crate::{
    domains::{playlist::PlaylistSequencer, progress::ProgressStore},
    error::{PlayerError, PlayerResult},
    infra::constants::player_controls::{
        MAX_PLAYBACK_RATE, MAX_VOLUME, MIN_PLAYBACK_RATE, MIN_VOLUME,
    },
};

pub type ControlsSubscriber = Box<dyn FnMut(&ControlsView) + Send>;

/// Owns the playback element and runs the reducer's effects against it,
/// the progress store and the playlist sequencer.
///
/// Public methods are the input boundary: out-of-range values are rejected
/// here with [`PlayerError::Validation`] and never reach the state machine.
pub struct PlaybackController<E: PlaybackElement, S: ProgressStore> {
    state: PlaybackState,
    element: E,
    progress: S,
    playlist: PlaylistSequencer,
    media_base: Url,
    view: ControlsView,
    subscriber: Option<ControlsSubscriber>,
    last_error: Option<PlayerError>,
}

impl<E: PlaybackElement, S: ProgressStore> fmt::Debug for PlaybackController<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("element", &self.element)
            .field("progress", &self.progress)
            .field("playlist", &self.playlist)
            .field("media_base", &self.media_base.as_str())
            .field("has_subscriber", &self.subscriber.is_some())
            .finish()
    }
}

impl<E: PlaybackElement, S: ProgressStore> PlaybackController<E, S> {
    /// `media_base` is the server origin media URLs are resolved against.
    pub fn new(element: E, progress: S, media_base: Url) -> Self {
        let state = PlaybackState::default();
        let view = ControlsView::from_state(&state);
        Self {
            state,
            element,
            progress,
            playlist: PlaylistSequencer::new(),
            media_base,
            view,
            subscriber: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn controls(&self) -> &ControlsView {
        &self.view
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn progress(&self) -> &S {
        &self.progress
    }

    pub fn playlist(&self) -> &PlaylistSequencer {
        &self.playlist
    }

    pub fn last_error(&self) -> Option<&PlayerError> {
        self.last_error.as_ref()
    }

    /// Called with the new controls whenever they change.
    pub fn subscribe(&mut self, subscriber: ControlsSubscriber) {
        self.subscriber = Some(subscriber);
    }

    // === Source lifecycle ===

    /// Loads a video picked outside any playlist. The active playlist is
    /// dropped so this video's end cannot resume it.
    pub fn load(&mut self, path: &str) -> PlayerResult<()> {
        let source = self.source_for(path)?;
        self.playlist.clear();
        self.last_error = None;
        info!("[Player] Loading {}", source.path);
        self.dispatch(PlayerMessage::Load {
            source,
            autoplay: true,
        });
        Ok(())
    }

    pub fn load_entry(&mut self, entry: &Entry) -> PlayerResult<()> {
        if !entry.is_video {
            return Err(PlayerError::validation(format!(
                "{} is not a video",
                entry.name
            )));
        }
        self.load(&entry.path)
    }

    /// Starts `items` from the first video. Returns `false` when there was
    /// nothing to play.
    pub fn start_playlist(&mut self, items: Vec<Entry>) -> PlayerResult<bool> {
        let videos: Vec<Entry> =
            items.into_iter().filter(|entry| entry.is_video).collect();
        let Some(first) = self.playlist.start(videos) else {
            return Ok(false);
        };
        let source = match self.source_for(&first.path) {
            Ok(source) => source,
            Err(err) => {
                self.playlist.clear();
                return Err(err);
            }
        };
        self.last_error = None;
        info!(
            "[Player] Starting playlist of {} videos",
            self.playlist.active().map(|context| context.len()).unwrap_or(0)
        );
        self.dispatch(PlayerMessage::Load {
            source,
            autoplay: true,
        });
        Ok(true)
    }

    pub fn close(&mut self) {
        self.playlist.clear();
        self.dispatch(PlayerMessage::Close);
    }

    // === Playback requests ===

    pub fn play(&mut self) {
        self.dispatch(PlayerMessage::RequestPlay);
    }

    pub fn pause(&mut self) {
        self.dispatch(PlayerMessage::RequestPause);
    }

    pub fn toggle_play_pause(&mut self) {
        self.dispatch(PlayerMessage::TogglePlayPause);
    }

    pub fn seek(&mut self, position: f64) -> PlayerResult<()> {
        if !position.is_finite() || position < 0.0 {
            return Err(PlayerError::validation(format!(
                "seek position must be a non-negative number of seconds, got {position}"
            )));
        }
        self.dispatch(PlayerMessage::RequestSeek(position));
        Ok(())
    }

    pub fn seek_relative(&mut self, delta: f64) -> PlayerResult<()> {
        if !delta.is_finite() {
            return Err(PlayerError::validation("seek offset must be finite"));
        }
        self.dispatch(PlayerMessage::SeekRelative(delta));
        Ok(())
    }

    // === Audio and presentation ===

    pub fn set_volume(&mut self, volume: f64) -> PlayerResult<()> {
        if !volume.is_finite() || !(MIN_VOLUME..=MAX_VOLUME).contains(&volume) {
            return Err(PlayerError::validation(format!(
                "volume must be between {MIN_VOLUME} and {MAX_VOLUME}, got {volume}"
            )));
        }
        self.dispatch(PlayerMessage::SetVolume(volume));
        Ok(())
    }

    /// Steps the volume; the result is clamped rather than rejected.
    pub fn adjust_volume(&mut self, delta: f64) -> PlayerResult<()> {
        if !delta.is_finite() {
            return Err(PlayerError::validation("volume step must be finite"));
        }
        self.dispatch(PlayerMessage::AdjustVolume(delta));
        Ok(())
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.dispatch(PlayerMessage::SetMuted(muted));
    }

    pub fn toggle_mute(&mut self) {
        self.dispatch(PlayerMessage::ToggleMute);
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> PlayerResult<()> {
        if !rate.is_finite()
            || !(MIN_PLAYBACK_RATE..=MAX_PLAYBACK_RATE).contains(&rate)
        {
            return Err(PlayerError::validation(format!(
                "playback rate must be between {MIN_PLAYBACK_RATE} and {MAX_PLAYBACK_RATE}, got {rate}"
            )));
        }
        self.dispatch(PlayerMessage::SetPlaybackRate(rate));
        Ok(())
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.dispatch(PlayerMessage::SetFullscreen(fullscreen));
    }

    pub fn toggle_fullscreen(&mut self) {
        self.dispatch(PlayerMessage::ToggleFullscreen);
    }

    // === Element callbacks ===

    pub fn handle_event(&mut self, event: ElementEvent) {
        self.dispatch(PlayerMessage::Element(event));
    }

    /// Session teardown: make every saved position durable.
    pub fn flush(&mut self) -> PlayerResult<()> {
        self.progress.flush()
    }

    fn source_for(&self, path: &str) -> PlayerResult<MediaSource> {
        let relative = path.trim_matches('/');
        if relative.is_empty() {
            return Err(PlayerError::validation("no video selected"));
        }
        let media_path = media_url(relative)
            .map_err(|err| PlayerError::validation(err.to_string()))?;
        let url = self
            .media_base
            .join(&media_path)
            .map_err(|err| PlayerError::validation(err.to_string()))?;
        Ok(MediaSource::new(relative, url))
    }

    fn dispatch(&mut self, message: PlayerMessage) {
        let mut queue = VecDeque::from([message]);
        while let Some(message) = queue.pop_front() {
            let Transition { state, effects } = reduce(&self.state, message);
            self.state = state;
            for effect in effects {
                self.run_effect(effect, &mut queue);
            }
        }
        self.publish();
    }

    fn run_effect(
        &mut self,
        effect: PlayerEffect,
        queue: &mut VecDeque<PlayerMessage>,
    ) {
        match effect {
            PlayerEffect::AssignSource(source) => {
                self.element.assign_source(&source)
            }
            PlayerEffect::Unload => self.element.unload(),
            PlayerEffect::Play => self.element.play(),
            PlayerEffect::Pause => self.element.pause(),
            PlayerEffect::Seek(position) => self.element.seek(position),
            PlayerEffect::ApplyVolume(volume) => self.element.set_volume(volume),
            PlayerEffect::ApplyMuted(muted) => self.element.set_muted(muted),
            PlayerEffect::ApplyPlaybackRate(rate) => {
                self.element.set_playback_rate(rate)
            }
            PlayerEffect::ApplyFullscreen(fullscreen) => {
                if let Err(err) = self.element.set_fullscreen(fullscreen) {
                    warn!("[Player] Fullscreen request rejected: {}", err);
                }
            }

            PlayerEffect::RestoreProgress { path } => {
                if let Some(position) = self.progress.restore(&path) {
                    debug!("[Player] Found saved position {:.1}s", position);
                    queue.push_back(PlayerMessage::ResumeAt(position));
                }
            }
            PlayerEffect::SaveProgress { path, position } => {
                if let Err(err) = self.progress.save(&path, position) {
                    warn!("[Player] Failed to save progress: {}", err);
                }
            }
            PlayerEffect::ClearProgress { path } => {
                if let Err(err) = self.progress.clear(&path) {
                    warn!("[Player] Failed to clear progress: {}", err);
                }
            }
            PlayerEffect::ItemEnded { path } => {
                self.advance_after(&path, queue)
            }
            PlayerEffect::ReportError(message) => {
                // A source that failed before metadata is unloaded, which
                // ends the playlist too.
                if !self.state.is_loaded() && self.playlist.is_active() {
                    warn!("[Player] Playlist stopped after a load failure");
                    self.playlist.clear();
                }
                self.last_error = Some(PlayerError::Playback(message));
            }
        }
    }

    fn advance_after(&mut self, ended: &str, queue: &mut VecDeque<PlayerMessage>) {
        let Some(next) = self.playlist.on_item_ended() else {
            debug!("[Player] {} ended, nothing queued", ended);
            queue.push_back(PlayerMessage::Close);
            return;
        };
        match self.source_for(&next.path) {
            Ok(source) => queue.push_back(PlayerMessage::Load {
                source,
                autoplay: true,
            }),
            Err(err) => {
                warn!("[Player] Skipping unplayable playlist item: {}", err);
                self.playlist.clear();
                queue.push_back(PlayerMessage::Close);
            }
        }
    }

    fn publish(&mut self) {
        let view = ControlsView::from_state(&self.state);
        if view == self.view {
            return;
        }
        self.view = view;
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&self.view);
        }
    }
}

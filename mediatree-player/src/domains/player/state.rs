use url::Url;

use crate::infra::constants::player_controls::{
    DEFAULT_PLAYBACK_RATE, DEFAULT_VOLUME, MAX_PLAYBACK_RATE, MAX_VOLUME,
    MIN_PLAYBACK_RATE, MIN_VOLUME,
};

/// A video the controller can load: where it lives in the tree and where
/// the element fetches its bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub path: String,
    pub url: Url,
}

impl MediaSource {
    pub fn new(path: impl Into<String>, url: Url) -> Self {
        Self {
            path: path.into(),
            url,
        }
    }
}

/// Where the machine is in a video's lifecycle.
///
/// Seeking is not a phase; it is tracked separately by
/// [`PlaybackState::is_seeking`] and can overlap any loaded phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    /// Duration is known and trusted from here on.
    MetadataReady,
    Ready,
    Playing,
    Paused,
    Ended,
}

impl Phase {
    pub fn has_metadata(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Loading)
    }
}

/// The authoritative view of what the current video is doing.
///
/// Flags reflect the last confirmed element event, never the last user
/// intent; outstanding requests are tracked on the side.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub phase: Phase,
    pub source: Option<MediaSource>,

    pub is_initialized: bool,
    pub is_playing: bool,
    pub is_muted: bool,
    pub volume: f64,
    pub playback_rate: f64,
    pub current_time: f64,
    pub duration: f64,
    pub is_seeking: bool,
    pub is_fullscreen: bool,
    /// Where the outstanding seek is headed. `current_time` keeps the last
    /// confirmed position until the element reports `Seeked`.
    pub seek_target: Option<f64>,

    // Outstanding requests
    pub play_requested: bool,
    pub autoplay: bool,
    pub pending_resume: Option<f64>,

    pub error: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            source: None,
            is_initialized: false,
            is_playing: false,
            is_muted: false,
            volume: DEFAULT_VOLUME,
            playback_rate: DEFAULT_PLAYBACK_RATE,
            current_time: 0.0,
            duration: 0.0,
            is_seeking: false,
            is_fullscreen: false,
            seek_target: None,
            play_requested: false,
            autoplay: false,
            pending_resume: None,
            error: None,
        }
    }
}

impl PlaybackState {
    /// Fresh per-video state. Volume, mute, rate and fullscreen carry over;
    /// everything else starts again.
    pub fn reset_for(&self, source: Option<MediaSource>) -> Self {
        let phase = if source.is_some() {
            Phase::Loading
        } else {
            Phase::Idle
        };
        Self {
            phase,
            source,
            is_muted: self.is_muted,
            volume: self.volume,
            playback_rate: self.playback_rate,
            is_fullscreen: self.is_fullscreen,
            ..Self::default()
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.source.as_ref().map(|source| source.path.as_str())
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    /// Clamps a position into `[0, duration]` once the duration is trusted.
    pub fn clamp_time(&self, position: f64) -> f64 {
        let position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        if self.is_initialized {
            position.min(self.duration)
        } else {
            position
        }
    }

    /// The position the scrubber shows: the seek target while a seek is
    /// outstanding, otherwise the confirmed position.
    pub fn displayed_time(&self) -> f64 {
        self.seek_target.unwrap_or(self.current_time)
    }

    /// Fraction of the video played, in `[0, 1]`, as displayed.
    pub fn progress_fraction(&self) -> f64 {
        if self.is_initialized && self.duration > 0.0 {
            (self.displayed_time() / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return MIN_VOLUME;
    }
    volume.clamp(MIN_VOLUME, MAX_VOLUME)
}

pub fn clamp_playback_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return DEFAULT_PLAYBACK_RATE;
    }
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MediaSource {
        MediaSource::new(
            "clip.mp4",
            Url::parse("http://localhost:3000/api/v1/media/clip.mp4").unwrap(),
        )
    }

    #[test]
    fn reset_keeps_audio_preferences_only() {
        let state = PlaybackState {
            phase: Phase::Playing,
            source: Some(source()),
            is_initialized: true,
            is_playing: true,
            is_muted: true,
            volume: 0.4,
            playback_rate: 1.5,
            current_time: 42.0,
            duration: 90.0,
            is_seeking: true,
            seek_target: Some(60.0),
            error: Some("boom".into()),
            ..PlaybackState::default()
        };

        let fresh = state.reset_for(None);
        assert_eq!(fresh.phase, Phase::Idle);
        assert!(fresh.is_muted);
        assert_eq!(fresh.volume, 0.4);
        assert_eq!(fresh.playback_rate, 1.5);
        assert_eq!(fresh.current_time, 0.0);
        assert!(!fresh.is_initialized);
        assert!(fresh.error.is_none());
        assert!(fresh.seek_target.is_none());

        assert_eq!(state.reset_for(Some(source())).phase, Phase::Loading);
    }

    #[test]
    fn time_is_clamped_only_once_duration_is_trusted() {
        let mut state = PlaybackState::default();
        assert_eq!(state.clamp_time(500.0), 500.0);
        assert_eq!(state.clamp_time(-3.0), 0.0);

        state.is_initialized = true;
        state.duration = 120.0;
        assert_eq!(state.clamp_time(500.0), 120.0);
        assert_eq!(state.clamp_time(f64::NAN), 0.0);
    }

    #[test]
    fn clamps_audio_ranges() {
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(-0.2), 0.0);
        assert_eq!(clamp_playback_rate(10.0), 3.0);
        assert_eq!(clamp_playback_rate(0.1), 0.25);
    }
}

use super::state::{Phase, PlaybackState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

/// Everything the control bar renders.
///
/// Always derived from [`PlaybackState`]; controls never hold state of
/// their own, so they cannot drift from what the element confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub enabled: bool,
    pub play_pause: PlayPauseIcon,
    pub volume_slider: f64,
    pub volume_icon: VolumeIcon,
    pub rate_label: String,
    pub progress: f64,
    pub time_label: String,
    pub is_seeking: bool,
    pub is_fullscreen: bool,
    pub error: Option<String>,
}

impl ControlsView {
    pub fn from_state(state: &PlaybackState) -> Self {
        let play_pause = if state.is_playing {
            PlayPauseIcon::Pause
        } else {
            PlayPauseIcon::Play
        };

        let volume_slider = if state.is_muted { 0.0 } else { state.volume };
        let volume_icon = if state.is_muted || state.volume == 0.0 {
            VolumeIcon::Muted
        } else if state.volume < 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        };

        let time_label = if state.is_initialized {
            format!(
                "{} / {}",
                format_time(state.displayed_time()),
                format_time(state.duration)
            )
        } else {
            format!("{} / --:--", format_time(state.displayed_time()))
        };

        Self {
            enabled: state.phase != Phase::Idle,
            play_pause,
            volume_slider,
            volume_icon,
            rate_label: format_rate(state.playback_rate),
            progress: state.progress_fraction(),
            time_label,
            is_seeking: state.is_seeking,
            is_fullscreen: state.is_fullscreen,
            error: state.error.clone(),
        }
    }
}

/// Formats seconds as `MM:SS`, or `HH:MM:SS` past the hour.
pub fn format_time(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// `1x`, `1.5x`, `0.25x`.
pub fn format_rate(rate: f64) -> String {
    let text = format!("{:.2}", rate);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_follow_confirmed_state() {
        let mut state = PlaybackState {
            phase: Phase::Ready,
            ..PlaybackState::default()
        };
        state.play_requested = true;
        assert_eq!(
            ControlsView::from_state(&state).play_pause,
            PlayPauseIcon::Play
        );

        state.is_playing = true;
        assert_eq!(
            ControlsView::from_state(&state).play_pause,
            PlayPauseIcon::Pause
        );
    }

    #[test]
    fn mute_zeroes_the_slider() {
        let state = PlaybackState {
            is_muted: true,
            volume: 0.8,
            ..PlaybackState::default()
        };
        let view = ControlsView::from_state(&state);
        assert_eq!(view.volume_slider, 0.0);
        assert_eq!(view.volume_icon, VolumeIcon::Muted);
    }

    #[test]
    fn time_label_waits_for_duration() {
        let mut state = PlaybackState {
            phase: Phase::Loading,
            current_time: 5.0,
            ..PlaybackState::default()
        };
        assert_eq!(ControlsView::from_state(&state).time_label, "00:05 / --:--");

        state.is_initialized = true;
        state.duration = 3725.0;
        assert_eq!(
            ControlsView::from_state(&state).time_label,
            "00:05 / 01:02:05"
        );
    }

    #[test]
    fn scrubber_shows_the_seek_target_until_confirmed() {
        let mut state = PlaybackState {
            phase: Phase::Playing,
            is_initialized: true,
            current_time: 30.0,
            duration: 120.0,
            is_seeking: true,
            seek_target: Some(90.0),
            ..PlaybackState::default()
        };
        let view = ControlsView::from_state(&state);
        assert_eq!(view.time_label, "01:30 / 02:00");
        assert_eq!(view.progress, 0.75);
        assert!(view.is_seeking);

        state.is_seeking = false;
        state.seek_target = None;
        let view = ControlsView::from_state(&state);
        assert_eq!(view.time_label, "00:30 / 02:00");
        assert_eq!(view.progress, 0.25);
    }

    #[test]
    fn rate_labels_are_compact() {
        assert_eq!(format_rate(1.0), "1x");
        assert_eq!(format_rate(1.5), "1.5x");
        assert_eq!(format_rate(0.25), "0.25x");
    }
}
